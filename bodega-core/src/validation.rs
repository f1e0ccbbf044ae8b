use crate::{CoreError, CoreResult};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_EMAIL_LEN: usize = 100;

/// Non-empty, bounded-length display name.
pub fn check_name(name: &str) -> CoreResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

pub fn check_description(description: &str) -> CoreResult<()> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "description must be at most {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

pub fn check_phone(phone: &str) -> CoreResult<()> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("phone must not be empty".into()));
    }
    if trimmed.len() > MAX_PHONE_LEN {
        return Err(CoreError::Validation(format!(
            "phone must be at most {} characters",
            MAX_PHONE_LEN
        )));
    }
    Ok(())
}

/// Minimal `local@domain.tld` shape check. Not RFC 5322; the boundary only
/// rejects obviously malformed input.
pub fn check_email(email: &str) -> CoreResult<()> {
    let trimmed = email.trim();
    if trimmed.len() > MAX_EMAIL_LEN {
        return Err(CoreError::Validation(format!(
            "email must be at most {} characters",
            MAX_EMAIL_LEN
        )));
    }
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    let domain_ok = {
        let (head, tld) = match domain.rfind('.') {
            Some(idx) => (&domain[..idx], &domain[idx + 1..]),
            None => ("", ""),
        };
        !head.is_empty() && tld.len() >= 2 && !domain.contains(' ')
    };
    if local.is_empty() || !domain_ok {
        return Err(CoreError::Validation(format!(
            "malformed email address: {}",
            trimmed
        )));
    }
    Ok(())
}

/// Prices are stored as non-negative integer cents.
pub fn check_price(price_cents: i32) -> CoreResult<()> {
    if price_cents < 0 {
        return Err(CoreError::Validation(
            "price must not be negative".into(),
        ));
    }
    Ok(())
}

/// Stock counts are rejected here, at the boundary, never by the stores.
pub fn check_stock(stock: i32) -> CoreResult<()> {
    if stock < 0 {
        return Err(CoreError::Validation(
            "stock must not be negative".into(),
        ));
    }
    Ok(())
}

pub fn check_quantity(quantity: i32) -> CoreResult<()> {
    if quantity < 1 {
        return Err(CoreError::Validation(
            "quantity must be at least 1".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(check_email("ana@example.com").is_ok());
        assert!(check_email("a.b-c@sub.example.co").is_ok());
        assert!(check_email("").is_err());
        assert!(check_email("no-at-sign").is_err());
        assert!(check_email("x@nodot").is_err());
        assert!(check_email("x@dot.").is_err());
        assert!(check_email("@example.com").is_err());
    }

    #[test]
    fn test_negative_amounts_rejected() {
        assert!(check_price(-1).is_err());
        assert!(check_stock(-1).is_err());
        assert!(check_quantity(0).is_err());
        assert!(check_price(0).is_ok());
        assert!(check_stock(0).is_ok());
        assert!(check_quantity(1).is_ok());
    }

    #[test]
    fn test_length_limits() {
        assert!(check_name(&"x".repeat(100)).is_ok());
        assert!(check_name(&"x".repeat(101)).is_err());
        assert!(check_name("  ").is_err());
        assert!(check_description(&"x".repeat(501)).is_err());
        assert!(check_phone(&"9".repeat(21)).is_err());
    }
}
