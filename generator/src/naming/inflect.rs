/// Turns words between their singular and plural forms.
///
/// Only the last word of a snake_case or CamelCase name is inflected, so `SimpleItems` becomes
/// `SimpleItem` and `order_status` becomes `order_statuses`.
pub trait Inflector {
    fn singularize(&self, word: &str) -> String;
    fn pluralize(&self, word: &str) -> String;
}

/// Strips or adds a trailing "s", with the usual "ies" special case.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeebleInflector;

/// Suffix rules plus tables of irregular and uncountable words.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishInflector;

/// Leaves every word as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInflection;

const UNCOUNTABLE: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "fish",
    "information",
    "metadata",
    "money",
    "moose",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

/// (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("criterion", "criteria"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

fn ends_with_consonant_y(word: &str) -> bool {
    let mut chars = word.chars().rev();
    matches!(
        (chars.next(), chars.next()),
        (Some('y'), Some(c)) if !is_vowel(c)
    )
}

fn plural_with_es(word: &str) -> bool {
    ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s))
}

/// Split a name before its last word.
fn split_last_word(name: &str) -> (&str, &str) {
    let after_underscore = name.rfind('_').map(|i| i + 1).unwrap_or(0);
    let at_capital = name
        .char_indices()
        .filter(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    name.split_at(after_underscore.max(at_capital))
}

/// Apply `f` to the lowercased last word of `name`, restoring its leading capital.
fn inflect_last_word(name: &str, f: impl Fn(&str) -> String) -> String {
    let (head, last) = split_last_word(name);
    if last.is_empty() {
        return name.to_string();
    }
    let capitalized = last.starts_with(char::is_uppercase);
    let inflected = f(&last.to_lowercase());
    let inflected = if capitalized {
        super::identifiers::upper_first(&inflected)
    } else {
        inflected
    };
    format!("{head}{inflected}")
}

impl Inflector for FeebleInflector {
    fn singularize(&self, word: &str) -> String {
        if let Some(stem) = word.strip_suffix("ies") {
            format!("{stem}y")
        } else if word.ends_with("ss") {
            word.to_string()
        } else if let Some(stem) = word.strip_suffix('s') {
            stem.to_string()
        } else {
            word.to_string()
        }
    }

    fn pluralize(&self, word: &str) -> String {
        if ends_with_consonant_y(word) {
            format!("{}ies", &word[..word.len() - 1])
        } else if plural_with_es(word) {
            format!("{word}es")
        } else {
            format!("{word}s")
        }
    }
}

fn english_singular(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    for (singular, plural) in IRREGULAR {
        if word == *plural || word == *singular {
            return singular.to_string();
        }
    }
    if word.len() > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "shes", "ches", "xes", "zzes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if let Some(stem) = word.strip_suffix("uses") {
        // houses, causes vs. statuses, buses
        return match stem.chars().last() {
            Some(c) if is_vowel(c) => format!("{stem}use"),
            Some(_) => format!("{stem}us"),
            None => "use".to_string(),
        };
    }
    if ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

fn english_plural(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    for (singular, plural) in IRREGULAR {
        if word == *singular || word == *plural {
            return plural.to_string();
        }
    }
    if plural_with_es(word) {
        format!("{word}es")
    } else if ends_with_consonant_y(word) {
        format!("{}ies", &word[..word.len() - 1])
    } else {
        format!("{word}s")
    }
}

impl Inflector for EnglishInflector {
    fn singularize(&self, word: &str) -> String {
        inflect_last_word(word, english_singular)
    }

    fn pluralize(&self, word: &str) -> String {
        inflect_last_word(word, english_plural)
    }
}

impl Inflector for NoInflection {
    fn singularize(&self, word: &str) -> String {
        word.to_string()
    }

    fn pluralize(&self, word: &str) -> String {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feeble() {
        let f = FeebleInflector;
        assert_eq!(f.singularize("SimpleItems"), "SimpleItem");
        assert_eq!(f.singularize("Studies"), "Study");
        assert_eq!(f.singularize("Class"), "Class");
        assert_eq!(f.singularize("Status"), "Statu");
        assert_eq!(f.pluralize("parent"), "parents");
        assert_eq!(f.pluralize("company"), "companies");
        assert_eq!(f.pluralize("box"), "boxes");
        assert_eq!(f.pluralize("day"), "days");
    }

    #[test]
    fn test_english_singular() {
        let e = EnglishInflector;
        assert_eq!(e.singularize("Statuses"), "Status");
        assert_eq!(e.singularize("Studies"), "Study");
        assert_eq!(e.singularize("Moose"), "Moose");
        assert_eq!(e.singularize("Manufacturers"), "Manufacturer");
        assert_eq!(e.singularize("SimpleItems"), "SimpleItem");
        assert_eq!(e.singularize("order_statuses"), "order_status");
        assert_eq!(e.singularize("Status"), "Status");
        assert_eq!(e.singularize("Houses"), "House");
        assert_eq!(e.singularize("People"), "Person");
        assert_eq!(e.singularize("Boxes"), "Box");
    }

    #[test]
    fn test_english_plural() {
        let e = EnglishInflector;
        assert_eq!(e.pluralize("status"), "statuses");
        assert_eq!(e.pluralize("study"), "studies");
        assert_eq!(e.pluralize("moose"), "moose");
        assert_eq!(e.pluralize("simple_item"), "simple_items");
        assert_eq!(e.pluralize("child"), "children");
        assert_eq!(e.pluralize("key"), "keys");
    }

    #[test]
    fn test_no_inflection() {
        assert_eq!(NoInflection.singularize("Studies"), "Studies");
        assert_eq!(NoInflection.pluralize("study"), "study");
    }
}
