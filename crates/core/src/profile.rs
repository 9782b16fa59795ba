//! Product demand profile: the read-only snapshot the analytics run against.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::id::ProductId;

/// Value-concentration class (A = highest cumulative sales value).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbcGrade {
    A,
    B,
    C,
}

/// Demand-variability class (X = stable, Z = erratic).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XyzGrade {
    X,
    Y,
    Z,
}

/// Snapshot of a product's classification and replenishment attributes.
///
/// Supplied by the host per analysis request; never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDemandProfile {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub abc_grade: Option<AbcGrade>,
    #[serde(default)]
    pub xyz_grade: Option<XyzGrade>,
    /// Annualized inventory turnover.
    #[serde(default)]
    pub turnover_rate: Option<f64>,
    /// Year-over-year demand growth, in percent.
    #[serde(default)]
    pub yoy_growth_rate: Option<f64>,
    #[serde(default)]
    pub is_overstock: bool,
    pub lead_time_days: u32,
    #[serde(default)]
    pub lead_time_std_dev_days: Option<f64>,
    pub current_safety_stock: u64,
    pub current_reorder_point: u64,
    /// On-hand units.
    #[serde(default)]
    pub current_stock: u64,
}

impl ProductDemandProfile {
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.lead_time_days < 1 {
            return Err(AnalyticsError::invalid("lead_time_days must be >= 1"));
        }
        if let Some(sd) = self.lead_time_std_dev_days {
            if !(sd.is_finite() && sd >= 0.0) {
                return Err(AnalyticsError::invalid(
                    "lead_time_std_dev_days must be a finite non-negative number",
                ));
            }
        }
        Ok(())
    }

    pub fn option(&self) -> ProductOption {
        ProductOption {
            id: self.id,
            sku: self.sku.clone(),
            name: self.name.clone(),
        }
    }
}

/// Minimal product descriptor for pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProductDemandProfile {
        ProductDemandProfile {
            id: ProductId::new(),
            sku: "SKU-1".to_string(),
            name: "Widget".to_string(),
            abc_grade: Some(AbcGrade::A),
            xyz_grade: None,
            turnover_rate: None,
            yoy_growth_rate: None,
            is_overstock: false,
            lead_time_days: 7,
            lead_time_std_dev_days: None,
            current_safety_stock: 40,
            current_reorder_point: 110,
            current_stock: 90,
        }
    }

    #[test]
    fn zero_lead_time_is_rejected() {
        let mut p = profile();
        p.lead_time_days = 0;
        assert!(matches!(p.validate(), Err(AnalyticsError::InvalidParameter(_))));
    }

    #[test]
    fn negative_lead_time_deviation_is_rejected() {
        let mut p = profile();
        p.lead_time_std_dev_days = Some(-1.0);
        assert!(p.validate().is_err());
        p.lead_time_std_dev_days = Some(1.5);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn deserializes_camel_case_with_optional_fields_missing() {
        let json = serde_json::json!({
            "id": "0190a5d6-7c2e-7000-8000-000000000001",
            "sku": "SKU-9",
            "name": "Bolt",
            "xyzGrade": "Y",
            "leadTimeDays": 5,
            "currentSafetyStock": 12,
            "currentReorderPoint": 30
        });
        let p: ProductDemandProfile = serde_json::from_value(json).unwrap();
        assert_eq!(p.xyz_grade, Some(XyzGrade::Y));
        assert_eq!(p.abc_grade, None);
        assert_eq!(p.current_stock, 0);
        assert_eq!(p.option().sku, "SKU-9");
    }
}
