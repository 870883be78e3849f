use fsq::core::pattern::NameMatcher;

fn compile(pattern: &str, case_sensitive: bool, glob: bool, regex: bool) -> NameMatcher {
    NameMatcher::compile(pattern, case_sensitive, glob, regex).expect("pattern should compile")
}

#[test]
fn empty_pattern_matches_everything() {
    let matcher = compile("", false, false, false);
    assert!(matcher.matches("anything.txt"));
    assert!(matcher.matches(""));
}

#[test]
fn substring_match_is_case_insensitive_by_default() {
    let matcher = compile("read", false, false, false);
    assert!(matcher.matches("README.md"));
    assert!(matcher.matches("spread.txt"));
    assert!(!matcher.matches("index.html"));
}

#[test]
fn substring_match_honours_case_sensitivity() {
    let matcher = compile("read", true, false, false);
    assert!(!matcher.matches("README.md"));
    assert!(matcher.matches("spread.txt"));
}

#[test]
fn glob_star_and_question_mark() {
    let matcher = compile("*.png", false, true, false);
    assert!(matcher.matches("a.png"));
    assert!(matcher.matches("photo.final.png"));
    assert!(!matcher.matches("a.jpg"));

    let matcher = compile("file?.txt", false, true, false);
    assert!(matcher.matches("file1.txt"));
    assert!(!matcher.matches("file12.txt"));
}

#[test]
fn glob_character_sets_and_alternation() {
    let matcher = compile("[abc].log", false, true, false);
    assert!(matcher.matches("a.log"));
    assert!(matcher.matches("c.log"));
    assert!(!matcher.matches("d.log"));

    let matcher = compile("photo.{jpg,png}", false, true, false);
    assert!(matcher.matches("photo.jpg"));
    assert!(matcher.matches("photo.png"));
    assert!(!matcher.matches("photo.gif"));
}

#[test]
fn glob_case_sensitivity_follows_the_flag() {
    let insensitive = compile("*.PNG", false, true, false);
    assert!(insensitive.matches("a.png"));

    let sensitive = compile("*.PNG", true, true, false);
    assert!(!sensitive.matches("a.png"));
    assert!(sensitive.matches("a.PNG"));
}

#[test]
fn regex_matching() {
    let matcher = compile(r"^[a-z]+\.rs$", true, false, true);
    assert!(matcher.matches("main.rs"));
    assert!(!matcher.matches("Main.rs"));
    assert!(!matcher.matches("main.rss"));
}

#[test]
fn regex_wins_when_both_flags_are_set() {
    // as a glob "a+" would only match the literal name "a+"
    let matcher = compile("a+", false, true, true);
    assert!(matcher.matches("aaa"));
}

#[test]
fn invalid_patterns_fail_to_compile() {
    assert!(NameMatcher::compile("(unclosed", false, false, true).is_err());
    assert!(NameMatcher::compile("[unclosed", false, true, false).is_err());
}
