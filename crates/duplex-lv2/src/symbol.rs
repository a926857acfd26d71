//! Conversion of parameter ids to LV2 port symbols.

use std::collections::HashSet;

/// Symbols handed out during one generation pass.
///
/// LV2 requires port symbols to be unique within a plugin description. Each
/// call to [`symbol_for`](Self::symbol_for) reserves the returned symbol;
/// [`clear`](Self::clear) starts a new pass (the presets document clears it
/// once per preset).
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    used: HashSet<String>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `name` and make it unique among the symbols of this pass.
    ///
    /// `port_index` (zero-based) names the placeholder used for empty input.
    pub fn symbol_for(&mut self, name: &str, port_index: usize) -> String {
        let base = normalize(name, port_index);
        let mut symbol = base.clone();
        let mut suffix = 2;
        while self.used.contains(&symbol) {
            symbol = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        self.used.insert(symbol.clone());
        symbol
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.used.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn clear(&mut self) {
        self.used.clear();
    }
}

/// Lowercase ASCII identifier for `name`.
///
/// Anything that is not an ASCII letter or digit becomes `_`, as does a
/// leading digit. Empty names map to `lv2_port_<port_index + 1>`.
pub fn normalize(name: &str, port_index: usize) -> String {
    let trimmed = name.trim().to_lowercase();
    if trimmed.is_empty() {
        return format!("lv2_port_{}", port_index + 1);
    }

    trimmed
        .chars()
        .enumerate()
        .map(|(i, c)| match c {
            '0'..='9' if i == 0 => '_',
            c if c.is_ascii_alphanumeric() => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Cutoff Freq ", 0), "cutoff_freq");
        assert_eq!(normalize("2nd Osc", 0), "_nd_osc");
        assert_eq!(normalize("Gain (dB)", 0), "gain__db_");
        assert_eq!(normalize("Größe", 0), "gr__e");
        assert_eq!(normalize("", 4), "lv2_port_5");
        assert_eq!(normalize("   ", 0), "lv2_port_1");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for symbol in ["gain", "cutoff_freq", "_nd_osc", "lv2_port_3", "mix_2"] {
            assert_eq!(normalize(symbol, 0), symbol);
            assert_eq!(normalize(&normalize(symbol, 0), 0), symbol);
        }
    }

    #[test]
    fn test_collisions_get_suffixes() {
        let mut symbols = SymbolRegistry::new();
        assert_eq!(symbols.symbol_for("Gain", 0), "gain");
        assert_eq!(symbols.symbol_for(" gain ", 1), "gain_2");
        assert_eq!(symbols.symbol_for("GAIN", 2), "gain_3");
        assert_eq!(symbols.symbol_for("Gain!", 3), "gain_");
        assert_eq!(symbols.len(), 4);

        // A literal "gain_2" after the suffixed one still ends up unique.
        assert_eq!(symbols.symbol_for("gain_2", 4), "gain_2_2");
    }

    #[test]
    fn test_clear_starts_a_new_pass() {
        let mut symbols = SymbolRegistry::new();
        symbols.symbol_for("mix", 0);
        assert!(symbols.contains("mix"));
        symbols.clear();
        assert!(symbols.is_empty());
        assert_eq!(symbols.symbol_for("mix", 0), "mix");
    }
}
