#[cfg(test)]
mod tests {

    mod search_filter_tests {
        use crate::services::posts::SearchFilter;

        #[test]
        fn test_parse_plain_term() {
            assert_eq!(
                SearchFilter::parse("Java"),
                SearchFilter::Title("Java".to_string())
            );
        }

        #[test]
        fn test_parse_tag_term() {
            assert_eq!(
                SearchFilter::parse("#java"),
                SearchFilter::Tag("java".to_string())
            );
        }

        #[test]
        fn test_parse_empty_matches_all() {
            assert_eq!(SearchFilter::parse(""), SearchFilter::Title(String::new()));
        }

        #[test]
        fn test_parse_bare_hash() {
            assert_eq!(SearchFilter::parse("#"), SearchFilter::Tag(String::new()));
        }

        #[test]
        fn test_parse_hash_inside_term_is_title() {
            assert_eq!(
                SearchFilter::parse("c#lang"),
                SearchFilter::Title("c#lang".to_string())
            );
        }

        #[test]
        fn test_parse_only_first_hash_is_stripped() {
            assert_eq!(
                SearchFilter::parse("##java"),
                SearchFilter::Tag("#java".to_string())
            );
        }
    }

    mod config_tests {
        use crate::Config;

        fn parse(toml_str: &str) -> Config {
            toml::from_str(toml_str).expect("config should parse")
        }

        #[test]
        fn test_minimal_config_gets_defaults() {
            let config = parse("[database]\npath = \"data/quill.db\"\n");
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.database.pool_size, 10);
            assert_eq!(config.api.default_page_size, 10);
            assert_eq!(config.api.max_page_size, 100);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_validate_rejects_zero_page_size() {
            let config = parse(
                "[database]\npath = \"data/quill.db\"\n[api]\ndefault_page_size = 0\n",
            );
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_validate_rejects_max_below_default() {
            let config = parse(
                "[database]\npath = \"data/quill.db\"\n[api]\ndefault_page_size = 50\nmax_page_size = 20\n",
            );
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_validate_rejects_zero_pool() {
            let config = parse("[database]\npath = \"data/quill.db\"\npool_size = 0\n");
            assert!(config.validate().is_err());
        }
    }
}
