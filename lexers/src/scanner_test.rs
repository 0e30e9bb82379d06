use crate::scanner::Scanner;

#[test]
fn extremes() {
    let mut s = Scanner::from_str("a test@");
    assert_eq!(s.curr(), None);
    assert_eq!(s.next(), Some('a'));
    assert_eq!(s.pos(), 0);
    while s.next() != Some('@') {}
    assert_eq!(s.curr(), Some('@'));
    assert_eq!(s.next(), None);
    assert_eq!(s.next(), None);
    assert!(s.is_exhausted());
}

#[test]
fn backtrack() {
    let mut s = Scanner::new(vec![1, 2, 3].into_iter());
    let start = s.pos();
    assert_eq!(s.next(), Some(1));
    assert_eq!(s.next(), Some(2));
    assert!(s.set_pos(start));
    assert_eq!(s.next(), Some(1));
    assert!(!s.set_pos(7));
    assert_eq!(s.peek(), Some(2));
    assert_eq!(s.curr(), Some(1));
}

#[test]
fn extract_consumes_front() {
    let mut s = Scanner::from_str("just a test");
    for _ in 0..4 { assert!(s.next().is_some()); }
    assert_eq!(s.extract_string(), "just");
    assert_eq!(s.pos(), -1);
    assert_eq!(s.peek(), Some(' '));
    assert_eq!(s.next(), Some(' '));
    s.ignore();
    assert_eq!(s.view(), &[] as &[char]);
    assert_eq!(s.next(), Some('a'));
}

#[test]
fn accept_and_skip() {
    let mut s = Scanner::from_str("heey  you!");
    assert_eq!(s.accept(&'e'), None);
    assert_eq!(s.accept(&'h'), Some('h'));
    assert!(s.skip_all_if(|c| *c == 'e'));
    assert_eq!(s.curr(), Some('e'));
    assert!(!s.skip_all_if(|c| *c == 'e'));
    assert!(s.until(|c| *c == '!'));
    assert!(!s.until(|c| *c == '!'));
    assert_eq!(s.curr(), Some('u'));
    assert_eq!(s.accept_if(|c| *c == '!'), Some('!'));
    assert_eq!(s.next(), None);
}
