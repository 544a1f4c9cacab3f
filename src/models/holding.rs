use serde::{Deserialize, Serialize};

// One recorded purchase (lot) of a symbol. Lots of the same symbol are kept apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: f64,
    pub cost_basis: f64,
}

impl Holding {
    pub fn new(symbol: &str, quantity: f64, cost_basis: f64) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            quantity,
            cost_basis,
        }
    }

    /// quantity × cost_basis
    pub fn total_cost(&self) -> f64 {
        self.quantity * self.cost_basis
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHolding {
    pub symbol: String,
    pub quantity: f64,
    pub cost_basis: f64,
}

impl NewHolding {
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.trim().is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(format!("Quantity must be a positive number, got {}", self.quantity));
        }
        if !self.cost_basis.is_finite() || self.cost_basis <= 0.0 {
            return Err(format!("Cost basis must be a positive number, got {}", self.cost_basis));
        }
        Ok(())
    }

    pub fn into_holding(self) -> Holding {
        Holding::new(&self.symbol, self.quantity, self.cost_basis)
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_symbol() {
        let holding = Holding::new("  aapl ", 10.0, 150.0);
        assert_eq!(holding.symbol, "AAPL");
        assert_eq!(holding.total_cost(), 1500.0);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let empty = NewHolding { symbol: "   ".into(), quantity: 1.0, cost_basis: 1.0 };
        assert!(empty.validate().is_err());

        let zero_qty = NewHolding { symbol: "MSFT".into(), quantity: 0.0, cost_basis: 1.0 };
        assert!(zero_qty.validate().is_err());

        let nan_cost = NewHolding { symbol: "MSFT".into(), quantity: 1.0, cost_basis: f64::NAN };
        assert!(nan_cost.validate().is_err());

        let ok = NewHolding { symbol: "msft".into(), quantity: 2.5, cost_basis: 300.0 };
        assert!(ok.validate().is_ok());
        assert_eq!(ok.into_holding().symbol, "MSFT");
    }
}
