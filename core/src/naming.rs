//! # Logical Resource Naming
//!
//! Reproduces how the deployment tool names API Gateway method resources, so
//! the method behind an `http` event can be found in the template.

/// Upper-cases the first character of `s`.
fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-cases the first character of `s` and lower-cases the rest.
fn capitalize(s: &str) -> String {
    upper_first(&s.to_lowercase())
}

/// Normalizes one path segment, e.g. `{pet-id}` into `PetDashidVar`.
///
/// The segment is capitalized first, then `-` becomes `Dash`, a `{...}`
/// variable becomes `...Var`, and anything else that is not ASCII
/// alphanumeric is dropped.
pub fn normalize_path_part(part: &str) -> String {
    let mut normalized = capitalize(part).replace('-', "Dash");
    if let (Some(start), Some(end)) = (normalized.find('{'), normalized.rfind('}')) {
        if start < end {
            normalized = format!(
                "{}{}Var{}",
                &normalized[..start],
                &normalized[start + 1..end],
                &normalized[end + 1..]
            );
        }
    }
    let alphanumeric: String = normalized
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    upper_first(&alphanumeric)
}

/// Normalizes a resource path, e.g. `/pets/{id}` into `PetsIdVar`.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty())
        .map(normalize_path_part)
        .collect()
}

/// Normalizes an HTTP verb, e.g. `get` into `Get`.
pub fn normalize_method_name(method: &str) -> String {
    upper_first(&method.to_lowercase())
}

/// Logical id of the method resource serving `method` on `path`.
pub fn method_logical_id(path: &str, method: &str) -> String {
    format!(
        "ApiGatewayMethod{}{}",
        normalize_path(path),
        normalize_method_name(method)
    )
}
