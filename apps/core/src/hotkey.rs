use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    Super,
}

impl Modifier {
    fn label(self) -> &'static str {
        match self {
            Self::Ctrl => "Ctrl",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Super => "Super",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    pub modifiers: Vec<Modifier>,
    pub key: String,
}

impl Display for Hotkey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.label())?;
        }
        write!(f, "{}", self.key)
    }
}

/// Accepts `Mod+...+Key`; the key itself may be `+`-free punctuation such
/// as `/`. Modifiers come back sorted and deduplicated.
pub fn parse_hotkey(input: &str) -> Result<Hotkey, String> {
    let parts: Vec<&str> = input
        .split('+')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() < 2 {
        return Err("hotkey must include at least one modifier and one key".to_string());
    }

    let mut modifiers = parts[..parts.len() - 1]
        .iter()
        .map(|part| normalize_modifier(part))
        .collect::<Result<Vec<_>, _>>()?;
    modifiers.sort();
    modifiers.dedup();

    let key = normalize_key(parts[parts.len() - 1])?;
    Ok(Hotkey { modifiers, key })
}

fn normalize_modifier(input: &str) -> Result<Modifier, String> {
    match input.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Ok(Modifier::Ctrl),
        "alt" | "option" => Ok(Modifier::Alt),
        "shift" => Ok(Modifier::Shift),
        "cmd" | "command" | "super" | "meta" | "win" => Ok(Modifier::Super),
        _ => Err(format!("unsupported modifier '{input}'")),
    }
}

fn normalize_key(input: &str) -> Result<String, String> {
    let upper = input.to_ascii_uppercase();
    if upper == "SPACE" {
        return Ok("Space".to_string());
    }

    if let Some(number) = upper.strip_prefix('F') {
        if let Ok(parsed) = number.parse::<u8>() {
            if (1..=24).contains(&parsed) {
                return Ok(format!("F{parsed}"));
            }
            return Err("function key must be between F1 and F24".to_string());
        }
    }

    let mut chars = upper.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() || c.is_ascii_punctuation() => {
            Ok(c.to_string())
        }
        _ => Err(format!("unsupported key '{input}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_hotkey, Modifier};

    #[test]
    fn parses_default_summon_hotkey() {
        let hotkey = parse_hotkey("Ctrl+Shift+/").unwrap();
        assert_eq!(hotkey.modifiers, vec![Modifier::Ctrl, Modifier::Shift]);
        assert_eq!(hotkey.key, "/");
        assert_eq!(hotkey.to_string(), "Ctrl+Shift+/");
    }

    #[test]
    fn canonicalizes_order_and_aliases() {
        let hotkey = parse_hotkey(" shift + cmd + space ").unwrap();
        assert_eq!(hotkey.to_string(), "Shift+Super+Space");

        let hotkey = parse_hotkey("control+alt+f12").unwrap();
        assert_eq!(hotkey.to_string(), "Ctrl+Alt+F12");
    }

    #[test]
    fn rejects_bare_key_and_unknown_modifier() {
        assert!(parse_hotkey("P").is_err());
        assert!(parse_hotkey("Hyper+P").is_err());
        assert!(parse_hotkey("Ctrl+F30").is_err());
        assert!(parse_hotkey("Ctrl+Enter").is_err());
    }
}
