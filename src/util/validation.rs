pub const PASSWORD_MIN: usize = 6;

pub fn is_valid_password(pass: &str) -> bool {
    pass.chars().count() >= PASSWORD_MIN
}

/// Minimal format check for an embedded avatar image: the payload must be a
/// `data:` URI whose media type is in the `image` family. The image bytes
/// themselves are not decoded.
pub fn is_image_data_uri(value: &str) -> bool {
    let Some(rest) = value.strip_prefix("data:") else {
        return false;
    };

    let media_type = rest.split([';', ',']).next().unwrap_or_default();
    media_type
        .parse::<mime::Mime>()
        .map(|m| m.type_() == mime::IMAGE)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{is_image_data_uri, is_valid_password};

    #[test]
    fn test_is_valid_password() {
        assert!(is_valid_password("admin123"));
        assert!(is_valid_password("123456"));
        assert!(!is_valid_password("12345"));
        assert!(!is_valid_password(""));
    }

    #[test]
    fn test_is_image_data_uri() {
        assert!(is_image_data_uri("data:image/png;base64,iVBORw0KGgo="));
        assert!(is_image_data_uri("data:image/jpeg;base64,/9j/4AAQ"));
        assert!(is_image_data_uri("data:image/svg+xml,<svg/>"));

        assert!(!is_image_data_uri(""));
        assert!(!is_image_data_uri("hello world"));
        assert!(!is_image_data_uri("data:text/plain;base64,aGk="));
        assert!(!is_image_data_uri("data:;base64,aGk="));
    }
}
