//! Category service

use crate::error::{PocketError, PocketResult};
use crate::models::category::fallback_name;
use crate::models::{Category, CategoryId, TransactionType};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Categories of one type, seeding the defaults first if there are none
    pub fn categories_for_type(&self, category_type: TransactionType) -> PocketResult<Vec<Category>> {
        self.storage.initialize_categories()?;
        self.storage.categories.get_by_type(category_type)
    }

    /// Every category, seeding the defaults first if there are none
    pub fn list(&self) -> PocketResult<Vec<Category>> {
        self.storage.initialize_categories()?;
        self.storage.categories.get_all()
    }

    /// Create a category; names are unique ignoring case
    pub fn create(&self, name: &str, category_type: TransactionType) -> PocketResult<Category> {
        let mut category = Category::new(name.trim(), category_type);

        category
            .validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        if self.storage.categories.get_by_name(&category.name)?.is_some() {
            return Err(PocketError::Duplicate {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        category.id = self.storage.categories.insert(&category)?;
        self.storage.log_create(&category)?;

        Ok(category)
    }

    /// Resolve a category from a name or an id ("3" or "cat-3")
    pub fn find(&self, name_or_id: &str) -> PocketResult<Category> {
        if let Ok(id) = name_or_id.parse::<CategoryId>() {
            if let Some(category) = self.storage.categories.get(id)? {
                return Ok(category);
            }
        }

        self.storage
            .categories
            .get_by_name(name_or_id)?
            .ok_or_else(|| PocketError::category_not_found(name_or_id))
    }

    /// Display name for `id`, or `Category <id>` if it no longer exists
    pub fn display_name(&self, id: CategoryId) -> PocketResult<String> {
        Ok(self
            .storage
            .categories
            .get(id)?
            .map(|c| c.name)
            .unwrap_or_else(|| fallback_name(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> Storage {
        Storage::in_memory().unwrap()
    }

    #[test]
    fn test_listing_expense_categories_seeds_defaults() {
        let storage = create_test_storage();
        let service = CategoryService::new(&storage);

        let names: Vec<String> = service
            .categories_for_type(TransactionType::Expense)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Food", "Transport", "Bills", "Entertainment"]);
        assert_eq!(service.list().unwrap().len(), 5);
    }

    #[test]
    fn test_create_category() {
        let storage = create_test_storage();
        let service = CategoryService::new(&storage);

        let rent = service.create("  Rent ", TransactionType::Expense).unwrap();
        assert_eq!(rent.name, "Rent");
        assert!(rent.id.is_assigned());

        let err = service.create("rent", TransactionType::Expense).unwrap_err();
        assert!(err.is_duplicate());

        let err = service.create("   ", TransactionType::Income).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_find_by_name_or_id() {
        let storage = create_test_storage();
        let service = CategoryService::new(&storage);
        service.list().unwrap();

        let food = service.find("food").unwrap();
        assert_eq!(food.name, "Food");
        assert_eq!(service.find(&food.id.get().to_string()).unwrap(), food);
        assert_eq!(service.find(&food.id.to_string()).unwrap(), food);
        assert!(service.find("Rent").unwrap_err().is_not_found());
    }

    #[test]
    fn test_display_name_fallback() {
        let storage = create_test_storage();
        let service = CategoryService::new(&storage);
        assert_eq!(
            service.display_name(CategoryId::new(41)).unwrap(),
            "Category 41"
        );
    }
}
