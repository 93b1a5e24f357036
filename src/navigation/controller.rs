use serde::{Deserialize, Serialize};

use crate::recipes::model::Recipe;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    #[default]
    Scanner,
    Recipes,
    Cooking,
    Shopping,
    Pantry,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no recipe selected for cooking")]
    NoRecipeSelected,
    #[error("action requires the {expected:?} view, current view is {actual:?}")]
    WrongView { expected: View, actual: View },
    #[error("review overlay is open")]
    ReviewOpen,
    #[error("review overlay is not open")]
    ReviewNotOpen,
    #[error("step {step} out of range for a recipe with {steps} steps")]
    StepOutOfRange { step: usize, steps: usize },
}

/// The recipe being cooked, held by value: the batch it came from may be
/// replaced while cooking is in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct CookingSession {
    pub recipe: Recipe,
    pub step: usize,
}

impl CookingSession {
    fn new(recipe: Recipe) -> Self {
        Self { recipe, step: 0 }
    }

    pub fn total_steps(&self) -> usize {
        self.recipe.steps.len()
    }

    pub fn instruction(&self) -> Option<&str> {
        self.recipe.steps.get(self.step).map(String::as_str)
    }

    pub fn is_last_step(&self) -> bool {
        self.step + 1 >= self.total_steps()
    }

    pub fn progress(&self) -> f64 {
        match self.total_steps() {
            0 => 0.0,
            n => (self.step + 1) as f64 / n as f64,
        }
    }
}

/// Screen state machine. There is no history stack: every back action names
/// its target view.
#[derive(Debug, Default)]
pub struct ViewController {
    view: View,
    cooking: Option<CookingSession>,
    review_open: bool,
}

impl ViewController {
    pub fn view(&self) -> View {
        self.view
    }

    pub fn cooking(&self) -> Option<&CookingSession> {
        self.cooking.as_ref()
    }

    pub fn review_open(&self) -> bool {
        self.review_open
    }

    /// Direct navigation from the menu. Cooking is only reachable while a
    /// recipe is selected.
    pub fn navigate(&mut self, target: View) -> Result<(), NavigationError> {
        self.ensure_no_overlay()?;
        if target == View::Cooking && self.cooking.is_none() {
            return Err(NavigationError::NoRecipeSelected);
        }
        self.view = target;
        Ok(())
    }

    /// Shown once a recipe batch has been published.
    pub fn show_recipes(&mut self) {
        self.view = View::Recipes;
    }

    pub fn select_recipe(&mut self, recipe: Recipe) -> Result<&CookingSession, NavigationError> {
        self.ensure_no_overlay()?;
        self.ensure_view(View::Recipes)?;
        self.view = View::Cooking;
        Ok(&*self.cooking.insert(CookingSession::new(recipe)))
    }

    pub fn close_cooking(&mut self) -> Result<(), NavigationError> {
        self.ensure_no_overlay()?;
        self.ensure_view(View::Cooking)?;
        self.cooking = None;
        self.view = View::Recipes;
        Ok(())
    }

    pub fn finish_cooking(&mut self) -> Result<(), NavigationError> {
        self.ensure_no_overlay()?;
        self.ensure_view(View::Cooking)?;
        if self.cooking.is_none() {
            return Err(NavigationError::NoRecipeSelected);
        }
        self.review_open = true;
        Ok(())
    }

    /// Closes the review overlay, returning to Recipes with no selection.
    /// Yields the session the review belongs to.
    pub fn submit_review(&mut self) -> Result<Option<CookingSession>, NavigationError> {
        self.close_review()
    }

    pub fn skip_review(&mut self) -> Result<(), NavigationError> {
        self.close_review().map(|_| ())
    }

    pub fn next_step(&mut self) -> Result<&CookingSession, NavigationError> {
        let session = self.active_session()?;
        if !session.is_last_step() {
            session.step += 1;
        }
        Ok(&*session)
    }

    pub fn previous_step(&mut self) -> Result<&CookingSession, NavigationError> {
        let session = self.active_session()?;
        session.step = session.step.saturating_sub(1);
        Ok(&*session)
    }

    pub fn go_to_step(&mut self, step: usize) -> Result<&CookingSession, NavigationError> {
        let session = self.active_session()?;
        let steps = session.total_steps();
        if step >= steps {
            return Err(NavigationError::StepOutOfRange { step, steps });
        }
        session.step = step;
        Ok(&*session)
    }

    pub fn current_instruction(&self) -> Result<&str, NavigationError> {
        self.ensure_view(View::Cooking)?;
        let session = self.cooking.as_ref().ok_or(NavigationError::NoRecipeSelected)?;
        session.instruction().ok_or(NavigationError::StepOutOfRange {
            step: session.step,
            steps: session.total_steps(),
        })
    }

    fn close_review(&mut self) -> Result<Option<CookingSession>, NavigationError> {
        if !self.review_open {
            return Err(NavigationError::ReviewNotOpen);
        }
        self.review_open = false;
        self.view = View::Recipes;
        Ok(self.cooking.take())
    }

    fn active_session(&mut self) -> Result<&mut CookingSession, NavigationError> {
        self.ensure_no_overlay()?;
        self.ensure_view(View::Cooking)?;
        self.cooking.as_mut().ok_or(NavigationError::NoRecipeSelected)
    }

    fn ensure_view(&self, expected: View) -> Result<(), NavigationError> {
        if self.view != expected {
            return Err(NavigationError::WrongView {
                expected,
                actual: self.view,
            });
        }
        Ok(())
    }

    fn ensure_no_overlay(&self) -> Result<(), NavigationError> {
        if self.review_open {
            return Err(NavigationError::ReviewOpen);
        }
        Ok(())
    }
}
