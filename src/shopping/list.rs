/// Missing-ingredient names with set semantics, kept in insertion order.
///
/// Names are compared exactly as the recipe generator produced them, so
/// "Tomato" and "tomato" are separate entries. No case folding is applied.
#[derive(Debug, Default, Clone)]
pub struct ShoppingList {
    items: Vec<String>,
}

impl ShoppingList {
    /// Returns `false` when the name was already on the list.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.items.push(name);
        true
    }

    /// Returns `false` when the name was not on the list.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.items.iter().position(|i| i == name) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|i| i == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

#[cfg(test)]
mod list_tests {
    use super::*;

    #[test]
    fn adding_twice_keeps_one_entry() {
        let mut list = ShoppingList::default();
        assert!(list.add("tomato"));
        assert!(!list.add("tomato"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn add_then_remove_empties() {
        let mut list = ShoppingList::default();
        list.add("tomato");
        assert!(list.remove("tomato"));
        assert!(list.is_empty());
    }

    #[test]
    fn removing_absent_name_is_noop() {
        let mut list = ShoppingList::default();
        assert!(!list.remove("basil"));
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn names_are_case_sensitive_and_ordered() {
        let mut list = ShoppingList::default();
        list.add("Tomato");
        list.add("basil");
        list.add("tomato");
        assert_eq!(list.items(), &["Tomato", "basil", "tomato"]);
    }
}
