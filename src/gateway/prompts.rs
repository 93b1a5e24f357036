use serde_json::{json, Value};

use super::SuggestionRequest;

pub const ANALYZE_FRIDGE: &str = "Identify all visible food ingredients in this fridge. \
Return only a simple JSON array of strings containing the ingredient names. \
Be concise (e.g., 'Milk', 'Eggs', 'Spinach').";

pub fn suggestion_prompt(req: &SuggestionRequest) -> String {
    let pantry = req
        .pantry
        .iter()
        .map(|i| i.describe())
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "Available in fridge: {}.\n\
         Available in pantry with quantities: {}.\n\
         Dietary restriction: {}.\n",
        req.fridge.join(", "),
        pantry,
        req.restriction,
    );
    if !req.urgent.is_empty() {
        prompt.push_str(&format!(
            "URGENT: The following items are expiring very soon or are expired. \
             PLEASE PRIORITIZE using these in the recipes: {}.\n",
            req.urgent.join(", ")
        ));
    }
    prompt.push_str(
        "\nSuggest 3 highly relevant and creative recipes based strictly on the ingredients \
         available in the fridge and pantry.\n\
         Consider the quantities provided for pantry items to ensure they are sufficient \
         for the recipes suggested.\n\n\
         Return a JSON array of objects with:\n\
         - id (unique string)\n\
         - name (the recipe name)\n\
         - difficulty (Easy, Medium, Hard)\n\
         - prepTime (e.g., '20 min')\n\
         - calories (number)\n\
         - description (short, punchy summary)\n\
         - imageDescription (detailed visual description for image generation)\n\
         - ingredients (array of {name, isMissing})\n\
         - steps (array of strings)\n\
         - rating (float 3.5-5.0)\n\
         - reviewCount (number)\n\
         - recentReviews (array of {userName, rating, comment, date})",
    );
    prompt
}

pub fn image_prompt(description: &str) -> String {
    format!(
        "Professional food photography, close-up shot of {description}. \
         Cinematic lighting, depth of field, vibrant colors, appetizing styling."
    )
}

pub fn speech_prompt(step: &str) -> String {
    format!("Read this cooking step clearly: {step}")
}

pub fn ingredient_list_schema() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

pub fn recipe_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "name": { "type": "STRING" },
                "difficulty": { "type": "STRING", "enum": ["Easy", "Medium", "Hard"] },
                "prepTime": { "type": "STRING" },
                "calories": { "type": "NUMBER" },
                "description": { "type": "STRING" },
                "imageDescription": { "type": "STRING" },
                "rating": { "type": "NUMBER" },
                "reviewCount": { "type": "NUMBER" },
                "ingredients": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING" },
                            "isMissing": { "type": "BOOLEAN" }
                        }
                    }
                },
                "steps": { "type": "ARRAY", "items": { "type": "STRING" } },
                "recentReviews": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "userName": { "type": "STRING" },
                            "rating": { "type": "NUMBER" },
                            "comment": { "type": "STRING" },
                            "date": { "type": "STRING" }
                        }
                    }
                }
            },
            "required": ["id", "name", "difficulty"]
        }
    })
}
