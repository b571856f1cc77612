use super::*;
use sdevice_basics::source::SourceManager;

#[test]
fn test_directive_table() {
    assert_eq!(parse_directive("define"), Some(TokenKind::Define));
    assert_eq!(parse_directive("undef"), Some(TokenKind::Undef));
    assert_eq!(parse_directive("setdep"), Some(TokenKind::Setdep));
    assert_eq!(parse_directive("if"), Some(TokenKind::If));
    assert_eq!(parse_directive("elif"), Some(TokenKind::Elif));
    assert_eq!(parse_directive("else"), Some(TokenKind::Else));
    assert_eq!(parse_directive("endif"), Some(TokenKind::Endif));
    assert_eq!(parse_directive("ifdef"), None);
    assert_eq!(parse_directive("Define"), None);
    assert_eq!(parse_directive("comment"), None);
    assert_eq!(parse_directive(""), None);
    for kind in TokenKind::ALL.iter().copied() {
        match kind.directive_name() {
            Some(name) => assert_eq!(parse_directive(name), Some(kind)),
            None => assert_eq!(kind, TokenKind::Comment),
        }
    }
}

#[test]
fn test_host_order() {
    assert_eq!(TokenKind::COUNT, 8);
    assert_eq!(
        TokenKind::ALL,
        [
            TokenKind::Define,
            TokenKind::Undef,
            TokenKind::Setdep,
            TokenKind::If,
            TokenKind::Elif,
            TokenKind::Else,
            TokenKind::Endif,
            TokenKind::Comment,
        ]
    );
    for (i, kind) in TokenKind::ALL.iter().enumerate() {
        assert_eq!(kind.index(), i);
    }
}

#[test]
fn test_display() {
    assert_eq!(TokenKind::Setdep.to_string(), "#setdep");
    assert_eq!(TokenKind::Comment.to_string(), "comment");
}

#[test]
fn test_token_listing() {
    let sm = SourceManager::new();
    let chunk = sm.add_file("dev.cmd", "File {}\n  #define A 1 # note\r\n#endif");
    let token = |kind, pos_start, pos_end| Token {
        kind,
        src: SourceRangeRef {
            chunk,
            pos_start,
            pos_end,
        },
    };
    assert_eq!(
        token(TokenKind::Define, 10, 17).to_string(),
        "dev.cmd:2:3 #define #define"
    );
    assert_eq!(
        token(TokenKind::Comment, 22, 28).to_string(),
        "dev.cmd:2:15 comment # note"
    );
    assert_eq!(
        token(TokenKind::Endif, 30, 36).to_string(),
        "dev.cmd:3:1 #endif #endif"
    );
}

#[test]
fn test_valid_symbols() {
    let none = ValidSymbols::none();
    assert!(none.is_empty());
    assert_eq!(none.iter().count(), 0);
    let all = ValidSymbols::all();
    assert!(TokenKind::ALL.iter().all(|&k| all.contains(k)));

    let mut set = ValidSymbols::from_kinds(&[TokenKind::If, TokenKind::Comment]);
    assert!(set.contains(TokenKind::If));
    assert!(!set.contains(TokenKind::Elif));
    set.insert(TokenKind::Endif);
    set.remove(TokenKind::If);
    assert_eq!(
        set.iter().collect::<Vec<_>>(),
        [TokenKind::Endif, TokenKind::Comment]
    );
    assert_eq!(format!("{:?}", set), "{Endif, Comment}");
    assert_eq!(
        set.with(TokenKind::Comment, false),
        ValidSymbols::from_kinds(&[TokenKind::Endif])
    );
}

#[test]
fn test_valid_symbols_from_host_vector() {
    let set = ValidSymbols::from_slice(&[false, false, true]);
    assert_eq!(set, ValidSymbols::from_kinds(&[TokenKind::Setdep]));
    let set = ValidSymbols::from_slice(&[true; 12]);
    assert_eq!(set, ValidSymbols::all());
    let mut host = [false; 8];
    host[TokenKind::Comment.index()] = true;
    assert_eq!(
        ValidSymbols::from_slice(&host),
        ValidSymbols::from_kinds(&[TokenKind::Comment])
    );
}
