//! Error reporting for sdevice command files.
//!
//! Every problem found in the input is an error: it is reported, processing goes on to find
//! more of them, and the run fails at the end.  Each error has a statically declared
//! [`DiagType`] (see [`diag_types`]), a message, a list of [`DiagSpan`]s pointing into the
//! source and an optional help line.
//!
//! Code that reports errors takes a [`&DiagSystem`](DiagSystem) and builds them with
//! [`DiagSystem::begin`].  Where they end up is decided by the [`DiagSink`]: [`DiagStore`]
//! keeps them in memory, [`print::DiagPrinter`] writes them to stderr.

use std::cell::{Cell, RefCell};

use indexmap::IndexMap;

use crate::source::SourceRange;

pub mod print;

/// A kind of error.  Declared with [`diag_types`], compared by address.
#[derive(Debug)]
pub struct DiagType {
    /// The component that declares this type.
    pub component: &'static str,
    /// Unique within the component.
    pub name: &'static str,
    /// Long-form explanation.
    pub description: &'static str,
}

impl PartialEq for DiagType {
    fn eq(&self, other: &DiagType) -> bool {
        std::ptr::eq(self, other)
    }
}
impl Eq for DiagType {}

/// A reported error.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub typ: &'static DiagType,
    pub msg: String,
    pub spans: Vec<DiagSpan>,
    pub help: Option<String>,
}

/// A piece of source attached to a [`Diagnostic`].
#[derive(Debug, Clone)]
pub struct DiagSpan {
    pub kind: DiagSpanKind,
    pub range: SourceRange,
    pub msg: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagSpanKind {
    /// Where the problem is.
    Primary,
    /// Related code, such as the opening of an unbalanced block.
    Secondary,
}

/// Where reported [`Diagnostic`]s go.
pub trait DiagSink {
    fn emit(&self, diag: Diagnostic);
}

/// A [`DiagSink`] collecting everything in a vector.
#[derive(Default)]
pub struct DiagStore {
    storage: RefCell<Vec<Diagnostic>>,
}

impl DiagStore {
    pub fn new() -> Self {
        DiagStore::default()
    }

    /// Returns the collected diagnostics, in reporting order.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.storage.into_inner()
    }
}

impl DiagSink for DiagStore {
    fn emit(&self, diag: Diagnostic) {
        self.storage.borrow_mut().push(diag);
    }
}

/// All [`DiagType`]s known to the program, filled at startup by the `register_diags`
/// function of every component.
#[derive(Default)]
pub struct DiagRegistry {
    components: IndexMap<&'static str, Vec<&'static DiagType>>,
}

impl DiagRegistry {
    pub fn new() -> Self {
        DiagRegistry::default()
    }

    /// Adds a component and its types.  A component may only be registered once, and every
    /// type must belong to it.
    pub fn register_component(&mut self, name: &'static str, types: &[&'static DiagType]) {
        let mut list: Vec<&'static DiagType> = Vec::with_capacity(types.len());
        for &typ in types {
            assert_eq!(typ.component, name, "{} is not part of its component", typ.name);
            if list.iter().any(|known| known.name == typ.name) {
                panic!("diagnostic {}.{} declared twice", name, typ.name);
            }
            list.push(typ);
        }
        if self.components.insert(name, list).is_some() {
            panic!("diagnostic component {} registered twice", name);
        }
    }

    /// Looks up a type by component and name.
    pub fn get_diagnostic(&self, component: &str, name: &str) -> Option<&'static DiagType> {
        self.components
            .get(component)?
            .iter()
            .copied()
            .find(|typ| typ.name == name)
    }
}

/// Reports the errors of one run to a sink and counts them.
pub struct DiagSystem<'a> {
    registry: &'a DiagRegistry,
    sink: &'a dyn DiagSink,
    error_count: Cell<usize>,
}

impl<'a> DiagSystem<'a> {
    pub fn new(registry: &'a DiagRegistry, sink: &'a dyn DiagSink) -> Self {
        DiagSystem {
            registry,
            sink,
            error_count: Cell::new(0),
        }
    }

    /// Starts building an error of a registered type.
    pub fn begin<'b>(&'b self, typ: &'static DiagType, msg: impl Into<String>) -> DiagBuilder<'b> {
        debug_assert_eq!(
            self.registry.get_diagnostic(typ.component, typ.name),
            Some(typ),
            "unregistered diagnostic type"
        );
        DiagBuilder {
            diags: self,
            diag: Diagnostic {
                typ,
                msg: msg.into(),
                spans: Vec::new(),
                help: None,
            },
        }
    }

    pub fn got_error(&self) -> bool {
        self.error_count() != 0
    }

    /// The number of errors emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.get()
    }
}

/// An error under construction.  Nothing is reported until [`DiagBuilder::emit`].
///
/// ```
/// use sdevice_basics::diag::DiagSystem;
/// use sdevice_basics::diag_types;
/// use sdevice_basics::source::SourceRange;
///
/// diag_types!(example_component,
///     err_redefined = "A name has been defined more than once.",
/// );
///
/// fn report(diags: &DiagSystem, name: &str, first: SourceRange, second: SourceRange) {
///     diags
///         .begin(err_redefined, format!("`{}` is already defined", name))
///         .primary(second, "defined again here")
///         .secondary(first, "first defined here")
///         .help("use `#undef` before defining it again")
///         .emit();
/// }
/// ```
#[must_use]
pub struct DiagBuilder<'a> {
    diags: &'a DiagSystem<'a>,
    diag: Diagnostic,
}

impl<'a> DiagBuilder<'a> {
    /// Sets the help line.  At most one per error.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        assert!(self.diag.help.is_none(), "help set twice");
        self.diag.help = Some(help.into());
        self
    }

    fn span(
        mut self,
        kind: DiagSpanKind,
        range: impl Into<SourceRange>,
        msg: impl Into<String>,
    ) -> Self {
        self.diag.spans.push(DiagSpan {
            kind,
            range: range.into(),
            msg: msg.into(),
        });
        self
    }

    pub fn primary(self, range: impl Into<SourceRange>, msg: impl Into<String>) -> Self {
        self.span(DiagSpanKind::Primary, range, msg)
    }

    pub fn secondary(self, range: impl Into<SourceRange>, msg: impl Into<String>) -> Self {
        self.span(DiagSpanKind::Secondary, range, msg)
    }

    pub fn emit(self) {
        let DiagBuilder { diags, diag } = self;
        diags.error_count.set(diags.error_count.get() + 1);
        diags.sink.emit(diag);
    }
}

/// Declares the error types of a component: a component name, then `name = "description"`
/// entries.  Each type becomes a `pub static &DiagType`, and a
/// `pub fn register_diags(&mut DiagRegistry)` registering all of them is generated.
#[macro_export]
macro_rules! diag_types {
    ($component:ident, $($typ:ident = $desc:literal),* $(,)?) => {
        $(
            // Equality is by address, so these must be statics.
            #[allow(non_upper_case_globals)]
            pub static $typ: &$crate::diag::DiagType = &$crate::diag::DiagType {
                component: stringify!($component),
                name: stringify!($typ),
                description: $desc,
            };
        )*

        pub fn register_diags(registry: &mut $crate::diag::DiagRegistry) {
            registry.register_component(stringify!($component), &[$($typ),*]);
        }
    };
}

#[cfg(test)]
mod tests;
