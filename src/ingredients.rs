use log::debug;

/// Canonical ingredient names and the variants that map onto them
const VARIANTS: &[(&str, &[&str])] = &[
    ("bell pepper", &["capsicum", "bellpepper"]),
    ("tomato", &["cherry tomato", "roma tomato"]),
];

/// Normalize raw ingredient names to a canonical, de-duplicated list.
///
/// Each item keeps only ASCII letters and spaces, is lowercased and has its
/// whitespace collapsed, then known variants are mapped to their canonical
/// name. Items that end up empty are dropped. The first occurrence of each name decides its position.
pub fn normalize_ingredients<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();

    for item in raw {
        let clean = clean_name(item.as_ref());
        if clean.is_empty() {
            continue;
        }

        let name = canonical_name(&clean).map(String::from).unwrap_or(clean);
        if !normalized.contains(&name) {
            normalized.push(name);
        }
    }

    debug!("Normalized ingredients: {:?}", normalized);
    normalized
}

fn clean_name(item: &str) -> String {
    item.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn canonical_name(clean: &str) -> Option<&'static str> {
    VARIANTS
        .iter()
        .find(|(key, variants)| *key == clean || variants.contains(&clean))
        .map(|(key, _)| *key)
}

/// Split a vision model's answer into one ingredient per line.
///
/// List markers such as `-`, `*`, `•` and `1.` are stripped, as is markdown
/// emphasis (`**Tomatoes**`). Blank lines and heading lines ending in `:` are
/// skipped.
pub fn parse_detected_ingredients(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| strip_emphasis(strip_list_marker(line)))
        .filter(|line| !line.is_empty() && !line.ends_with(':'))
        .map(String::from)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(['-', '•']) {
        return rest.trim();
    }
    // A lone `*` is a bullet, `**` opens bold text
    if let Some(rest) = line.strip_prefix("* ") {
        return rest.trim();
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            // `1.5 kg rice` is a quantity, not a numbered item
            if rest.starts_with(char::is_whitespace) {
                return rest.trim();
            }
        }
    }
    line
}

fn strip_emphasis(line: &str) -> &str {
    line.trim_matches(['*', '_']).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_map_to_canonical_names() {
        let normalized = normalize_ingredients(["Capsicum", "Roma Tomato", "bellpepper"]);
        assert_eq!(normalized, vec!["bell pepper", "tomato"]);
    }

    #[test]
    fn test_non_letters_are_removed() {
        let normalized = normalize_ingredients(["Garlic (2 cloves)", "Onion!", "  basil  "]);
        assert_eq!(normalized, vec!["garlic cloves", "onion", "basil"]);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let normalized = normalize_ingredients(["onion", "tomato", "ONION", "cherry tomato"]);
        assert_eq!(normalized, vec!["onion", "tomato"]);
    }

    #[test]
    fn test_empty_items_are_dropped() {
        let normalized = normalize_ingredients(["", "123", "  ", "egg"]);
        assert_eq!(normalized, vec!["egg"]);
    }

    #[test]
    fn test_unknown_ingredients_pass_through() {
        let normalized = normalize_ingredients(vec!["Paneer".to_string()]);
        assert_eq!(normalized, vec!["paneer"]);
    }

    #[test]
    fn test_parse_detected_ingredients() {
        let text = "Here is what I see:\n- Tomatoes\n* Onion\n• Garlic\n1. Rice\n2) Eggs\n\n";
        assert_eq!(
            parse_detected_ingredients(text),
            vec!["Tomatoes", "Onion", "Garlic", "Rice", "Eggs"]
        );
    }

    #[test]
    fn test_parse_markdown_bold_lines() {
        let text = "**Produce:**\n* **Tomatoes**\n* 1.5 kg rice\n__Dairy__:\n- _Milk_\n";
        assert_eq!(
            parse_detected_ingredients(text),
            vec!["Tomatoes", "1.5 kg rice", "Milk"]
        );
    }

    #[test]
    fn test_parse_quantity_is_not_a_list_number() {
        assert_eq!(
            parse_detected_ingredients("1.5 kg rice\n2. Eggs"),
            vec!["1.5 kg rice", "Eggs"]
        );
    }

    #[test]
    fn test_parse_plain_lines() {
        assert_eq!(
            parse_detected_ingredients("milk\r\nbutter"),
            vec!["milk", "butter"]
        );
    }
}
