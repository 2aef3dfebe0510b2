#[cfg(test)]
mod tests {
    use acces_client::libs::version::Version;

    #[test]
    fn test_parse_clean_version() {
        assert_eq!(Version::parse("1.5.2"), Version::new(1, 5, 2));
    }

    #[test]
    fn test_parse_strips_decorations() {
        // Prefixes, suffixes and stray characters are stripped before parsing.
        assert_eq!(Version::parse("v1.5.2-beta"), Version::new(1, 5, 2));
        assert_eq!(Version::parse(" 2.0.1 \n"), Version::new(2, 0, 1));
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(Version::parse(""), Version::ZERO);
        assert_eq!(Version::parse("garbage"), Version::ZERO);
        assert_eq!(Version::parse("..."), Version::ZERO);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        assert_eq!(Version::parse("1.4"), Version::new(1, 4, 0));
        assert_eq!(Version::parse("1.4"), Version::parse("1.4.0"));
        assert_eq!(Version::parse("7"), Version::new(7, 0, 0));
    }

    #[test]
    fn test_ordering_is_field_by_field() {
        assert!(Version::parse("1.5.0") > Version::parse("1.4.9"));
        assert!(Version::parse("1.10.0") > Version::parse("1.9.9"));
        assert!(Version::parse("2.0.0") > Version::parse("1.99.99"));
        assert!(Version::parse("1.4.9") < Version::parse("1.5.0"));
    }

    #[test]
    fn test_equal_versions_do_not_compare_greater() {
        assert!(!(Version::parse("1.4") > Version::parse("1.4.0")));
        assert_eq!(Version::parse("1.4"), Version::parse("1.4.0"));
    }

    #[test]
    fn test_display_round_trip() {
        let version = Version::parse("v3.2.1");
        assert_eq!(version.to_string(), "3.2.1");
        assert_eq!(Version::parse(&version.to_string()), version);
    }
}
