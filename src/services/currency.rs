//! Currency service

use crate::config::Settings;
use crate::error::{PocketError, PocketResult};
use crate::models::currency::{is_valid_code, normalize_code};
use crate::models::{Currency, CurrencyId};
use crate::storage::Storage;

/// Service for currency management
pub struct CurrencyService<'a> {
    storage: &'a Storage,
}

impl<'a> CurrencyService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> PocketResult<Vec<Currency>> {
        self.storage.currencies.get_all()
    }

    /// The default currency
    pub fn default_currency(&self) -> PocketResult<Currency> {
        self.storage
            .currencies
            .get_default()?
            .ok_or_else(|| PocketError::currency_not_found("default"))
    }

    /// Resolve a code such as "usd" to its stored row
    pub fn find_by_code(&self, code: &str) -> PocketResult<Currency> {
        self.storage
            .currencies
            .get_by_code(code)?
            .ok_or_else(|| PocketError::currency_not_found(normalize_code(code)))
    }

    /// Code for a currency id, or "Unknown"
    pub fn code_for(&self, id: CurrencyId) -> PocketResult<String> {
        Ok(self
            .storage
            .currencies
            .get(id)?
            .map(|c| c.code)
            .unwrap_or_else(|| "Unknown".to_string()))
    }

    /// Switch the default currency to `code`
    ///
    /// The code must be one of `settings.supported_currencies`.
    pub fn set_default(&self, code: &str, settings: &Settings) -> PocketResult<Currency> {
        let code = normalize_code(code);

        if !is_valid_code(&code) || !settings.supports_currency(&code) {
            return Err(PocketError::Validation(format!(
                "Unsupported currency '{}'. Choose one of: {}",
                code,
                settings.supported_currencies.join(", ")
            )));
        }

        let before = self.storage.currencies.get_default()?;
        if before.as_ref().map_or(false, |c| c.code == code) {
            return self.default_currency();
        }

        let currency = self.storage.currencies.set_default(&code)?;
        tracing::info!(code = %currency.code, "switched default currency");

        match before {
            Some(old) => self.storage.log_update(&old, &currency)?,
            None => self.storage.log_create(&currency)?,
        }

        Ok(currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> Storage {
        let storage = Storage::in_memory().unwrap();
        storage.bootstrap(&Settings::default()).unwrap();
        storage
    }

    #[test]
    fn test_default_after_bootstrap() {
        let storage = create_test_storage();
        let service = CurrencyService::new(&storage);
        assert_eq!(service.default_currency().unwrap().code, "LKR");
    }

    #[test]
    fn test_set_default_switches_atomically() {
        let storage = create_test_storage();
        let service = CurrencyService::new(&storage);
        let settings = Settings::default();

        let usd = service.set_default("usd", &settings).unwrap();
        assert_eq!(usd.code, "USD");
        assert_eq!(service.default_currency().unwrap(), usd);

        service.set_default("LKR", &settings).unwrap();
        let all = service.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|c| c.is_default).count(), 1);
        assert_eq!(service.default_currency().unwrap().code, "LKR");
    }

    #[test]
    fn test_set_default_rejects_unsupported_code() {
        let storage = create_test_storage();
        let service = CurrencyService::new(&storage);

        let err = service.set_default("XYZ", &Settings::default()).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.default_currency().unwrap().code, "LKR");
    }

    #[test]
    fn test_code_lookup_fallback() {
        let storage = create_test_storage();
        let service = CurrencyService::new(&storage);
        let lkr = service.find_by_code("lkr").unwrap();
        assert_eq!(service.code_for(lkr.id).unwrap(), "LKR");
        assert_eq!(service.code_for(CurrencyId::new(99)).unwrap(), "Unknown");
    }
}
