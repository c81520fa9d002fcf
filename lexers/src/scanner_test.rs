use crate::scanner::Scanner;

fn text(chars: Vec<char>) -> String {
    chars.into_iter().collect()
}

#[test]
fn test_extremes() {
    let mut s = Scanner::from_str("just a test buffer@");
    assert_eq!(s.prev(), None);
    assert_eq!(s.next(), Some('j'));
    assert_eq!(s.prev(), None);
    while s.next() != Some('@') {}
    assert_eq!(s.curr(), Some('@'));
    assert_eq!(s.prev(), Some('r'));
    assert_eq!(s.prev(), Some('e'));
    assert_eq!(s.next(), Some('r'));
    assert_eq!(s.next(), Some('@'));
    assert_eq!(s.next(), None);
    assert_eq!(s.next(), None);
    assert_eq!(s.prev(), Some('@'));
}

#[test]
fn test_extract() {
    let mut s = Scanner::from_str("just a test buffer@");
    for _ in 0..4 { assert!(s.next().is_some()); }
    assert_eq!(text(s.extract()), "just");
    assert_eq!(s.peek(), Some(' '));
    assert_eq!(s.prev(), None);
    assert_eq!(s.next(), Some(' '));
    for _ in 0..6 { assert!(s.next().is_some()); }
    assert_eq!(s.view().iter().collect::<String>(), " a test");
    assert_eq!(text(s.extract()), " a test");
    assert_eq!(s.next(), Some(' '));
    s.ignore();
    assert_eq!(s.curr(), None);
    assert_eq!(s.next(), Some('b'));
}

#[test]
fn test_predicates() {
    let mut s = Scanner::from_str("42 apples");
    assert!(s.skip_matching(|c| c.is_ascii_digit()));
    assert!(!s.skip_matching(|c| c.is_ascii_digit()));
    assert_eq!(s.curr(), Some('2'));
    assert_eq!(text(s.extract()), "42");
    assert!(s.skip_matching(|c| c.is_whitespace()));
    s.ignore();
    assert!(s.until(|c| *c == 's'));
    assert_eq!(text(s.extract()), "apple");
    assert!(!s.until(|c| *c == 's'));
    assert!(s.until(|c| c.is_whitespace()));
    assert_eq!(text(s.extract()), "s");
    assert_eq!(s.peek(), None);
}

#[test]
fn test_any_iterator() {
    let mut s = Scanner::new(vec![1, 2, 3].into_iter());
    assert_eq!(s.peek(), Some(1));
    assert_eq!(s.next(), Some(1));
    assert!(s.skip_matching(|n| *n < 3));
    assert_eq!(s.extract(), vec![1, 2]);
    assert_eq!(s.collect::<Vec<_>>(), vec![3]);
}
