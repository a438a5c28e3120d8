use ltools_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_clean_invariants(s in "[a-z./\\\\]{0,32}") {
        let cleaned = NormalizedPath::new(&s).clean();
        let as_str = cleaned.as_str();

        prop_assert!(!as_str.contains('\\'));
        prop_assert!(!as_str.contains("//"));
        if as_str != "." {
            prop_assert!(!as_str.split('/').any(|c| c == "."));
        }

        // Cleaning is stable
        prop_assert_eq!(cleaned.clean(), cleaned.clone());
    }

    #[test]
    fn test_anchor_of_relative_stays_under_absolute_root(segment in "[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
        let root = NormalizedPath::new("/root/project");
        let anchored = root.anchor(&segment);
        prop_assert!(anchored.is_absolute());
        prop_assert!(anchored.as_str().starts_with("/root/project/"));
    }
}
