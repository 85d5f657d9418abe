//! Validation utilities for the Farm Inventory Management Platform

use rust_decimal::Decimal;

// ============================================================================
// Stock Validations
// ============================================================================

/// Validate that a quantity is strictly positive
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate that a purpose is present and non-blank
pub fn validate_purpose(purpose: &str) -> Result<(), &'static str> {
    if purpose.trim().is_empty() {
        return Err("Purpose cannot be empty");
    }
    Ok(())
}

/// Validate item threshold configuration
///
/// The reorder level must be non-negative, and the maximum level, when
/// configured, must not be below the reorder level.
pub fn validate_thresholds(
    reorder_level: Decimal,
    maximum_level: Option<Decimal>,
) -> Result<(), &'static str> {
    if reorder_level < Decimal::ZERO {
        return Err("Reorder level cannot be negative");
    }
    if let Some(max) = maximum_level {
        if max < reorder_level {
            return Err("Maximum level cannot be below the reorder level");
        }
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate SKU format (3-32 characters, alphanumeric plus dash)
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.len() < 3 {
        return Err("SKU must be at least 3 characters");
    }
    if sku.len() > 32 {
        return Err("SKU must be at most 32 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err("SKU must be alphanumeric with dashes only");
    }
    Ok(())
}
