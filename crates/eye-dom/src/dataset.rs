//! Dataset key mapping
//!
//! `dataset` keys are camelCase; the backing attributes are `data-kebab-case`.

/// `userId` -> `data-user-id`
pub fn to_attribute_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 8);
    name.push_str("data-");
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

/// `data-user-id` -> `userId`; `None` for non-data attributes
pub fn to_camel_case(attr: &str) -> Option<String> {
    let rest = attr.strip_prefix("data-")?;
    let mut key = String::with_capacity(rest.len());
    let mut upper_next = false;
    for c in rest.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            key.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            key.push(c);
        }
    }
    Some(key)
}
