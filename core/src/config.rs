use std::fmt;
use std::str::FromStr;

/// # Variant
/// Two opcodes behave differently between the COSMAC VIP interpreter and most
/// later implementations.
///
/// | opcode        | `Original`                      | `Modern`                   |
/// |---------------|---------------------------------|----------------------------|
/// | `8XY6`/`8XYE` | Vx = Vy, then shift Vx          | shift Vx in place          |
/// | `BNNN`        | PC = NNN + V0                   | PC = XNN + Vx              |
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Variant {
    Original,
    Modern,
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Modern
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(Variant::Original),
            "modern" => Ok(Variant::Modern),
            other => Err(format!(
                "unknown variant '{}', expected 'original' or 'modern'",
                other
            )),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Variant::Original => write!(f, "original"),
            Variant::Modern => write!(f, "modern"),
        }
    }
}

/// Interpreter settings fixed at construction.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub variant: Variant,
}

impl Config {
    pub fn new(variant: Variant) -> Self {
        Config { variant }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_variants_case_insensitively() {
        assert_eq!("original".parse(), Ok(Variant::Original));
        assert_eq!("Modern".parse(), Ok(Variant::Modern));
    }

    #[test]
    fn test_rejects_unknown_variant() {
        assert!("schip".parse::<Variant>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let variant = Variant::Original;
        assert_eq!(variant.to_string().parse(), Ok(variant));
    }

    #[test]
    fn test_defaults_to_modern() {
        assert_eq!(Config::default().variant, Variant::Modern);
    }
}
