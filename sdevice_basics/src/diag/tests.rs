use super::*;
use crate::source::{SourceManager, SourceRangeRef};

mod directives {
    diag_types!(directives,
        err_unmatched = "Unmatched directive.",
        err_unclosed = "Unclosed block.",
    );
}

mod remarks {
    diag_types!(remarks,
        err_stray = "Stray remark.",
    );
}

#[test]
fn test_registry() {
    let mut registry = DiagRegistry::new();
    directives::register_diags(&mut registry);
    remarks::register_diags(&mut registry);

    assert_eq!(
        registry.get_diagnostic("directives", "err_unmatched"),
        Some(directives::err_unmatched)
    );
    assert_eq!(
        registry.get_diagnostic("directives", "err_unclosed"),
        Some(directives::err_unclosed)
    );
    assert_eq!(
        registry.get_diagnostic("remarks", "err_stray"),
        Some(remarks::err_stray)
    );
    assert_eq!(registry.get_diagnostic("remarks", "err_unmatched"), None);
    assert_eq!(registry.get_diagnostic("outline", "err_stray"), None);
    assert_ne!(directives::err_unmatched, directives::err_unclosed);
}

mod directives_again {
    diag_types!(directives,
        err_other = "Another error.",
    );
}

#[test]
#[should_panic]
fn test_registry_dup_component() {
    let mut registry = DiagRegistry::new();
    directives::register_diags(&mut registry);
    directives_again::register_diags(&mut registry);
}

#[test]
#[should_panic]
fn test_registry_wrong_component() {
    let mut registry = DiagRegistry::new();
    // The macro can't produce this.
    registry.register_component(
        "directives",
        &[&DiagType {
            component: "remarks",
            name: "err_lost",
            description: "Some error.",
        }],
    );
}

#[test]
#[should_panic]
fn test_registry_dup_type() {
    let mut registry = DiagRegistry::new();
    registry.register_component("remarks", &[remarks::err_stray, remarks::err_stray]);
}

#[test]
fn test_error_count() {
    let mut registry = DiagRegistry::new();
    directives::register_diags(&mut registry);
    let sink = DiagStore::new();
    {
        let diags = DiagSystem::new(&registry, &sink);
        assert!(!diags.got_error());
        diags.begin(directives::err_unmatched, "first").emit();
        assert!(diags.got_error());
        diags.begin(directives::err_unclosed, "second").emit();
        diags.begin(directives::err_unmatched, "third").emit();
        assert_eq!(diags.error_count(), 3);
    }
    let msgs: Vec<_> = sink.into_vec().into_iter().map(|d| d.msg).collect();
    assert_eq!(msgs, ["first", "second", "third"]);
}

#[test]
fn test_builder() {
    let mut registry = DiagRegistry::new();
    directives::register_diags(&mut registry);
    let sm = SourceManager::new();
    let chunk = sm.add_file("meh.cmd", "#if 1\n#else\n#else\n");
    let sink = DiagStore::new();
    let diags = DiagSystem::new(&registry, &sink);
    diags
        .begin(directives::err_unmatched, "double #else")
        .primary(chunk.start().range_len(3), "opened here")
        .secondary(
            SourceRangeRef {
                chunk,
                pos_start: 6,
                pos_end: 11,
            },
            "first #else",
        )
        .help("remove one")
        .emit();
    let res = sink.into_vec();
    assert_eq!(res.len(), 1);
    let diag = &res[0];
    assert_eq!(diag.typ, directives::err_unmatched);
    assert_eq!(diag.msg, "double #else");
    assert_eq!(diag.help.as_deref(), Some("remove one"));
    assert_eq!(diag.spans.len(), 2);
    assert_eq!(diag.spans[0].kind, DiagSpanKind::Primary);
    assert_eq!(&*sm.expand_range(diag.spans[0].range), "#if");
    assert_eq!(diag.spans[1].kind, DiagSpanKind::Secondary);
    assert_eq!(diag.spans[1].msg, "first #else");
    assert_eq!(&*sm.expand_range(diag.spans[1].range), "#else");
}

#[test]
#[should_panic]
fn test_builder_double_help() {
    let mut registry = DiagRegistry::new();
    remarks::register_diags(&mut registry);
    let sink = DiagStore::new();
    let diags = DiagSystem::new(&registry, &sink);
    let _ = diags.begin(remarks::err_stray, "E").help("one").help("two");
}
