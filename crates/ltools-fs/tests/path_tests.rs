use ltools_fs::NormalizedPath;
use rstest::rstest;

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("foo\\bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_normalize_mixed_slashes() {
    let path = NormalizedPath::new("foo/bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("foo/bar");
    let joined = base.join("baz");
    assert_eq!(joined.as_str(), "foo/bar/baz");
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("/config/dir/aws-lambda.yml");
    let parent = path.parent().unwrap();
    assert_eq!(parent.as_str(), "/config/dir");
}

#[test]
fn test_extension() {
    assert_eq!(NormalizedPath::new("dir/aws-lambda.yml").extension(), Some("yml"));
    assert_eq!(NormalizedPath::new("dir/.hidden").extension(), None);
}

#[rstest]
#[case("/srv/project", "src", "/srv/project/src")]
#[case("/srv/project", "./src/hello", "/srv/project/src/hello")]
#[case("/srv/project", "src/../lib", "/srv/project/lib")]
#[case("/srv/project", "../other/src", "/srv/other/src")]
#[case("/srv/project", "/abs/src", "/abs/src")]
#[case("/srv/project/", "src", "/srv/project/src")]
fn test_anchor(#[case] root: &str, #[case] segment: &str, #[case] expected: &str) {
    let root = NormalizedPath::new(root);
    assert_eq!(root.anchor(segment).as_str(), expected);
}

#[rstest]
#[case("/a/b", true)]
#[case("C:/a", true)]
#[case("c:\\a", true)]
#[case("a/b", false)]
#[case("./a", false)]
fn test_is_absolute(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(NormalizedPath::new(input).is_absolute(), expected);
}
