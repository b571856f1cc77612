use sdevice_basics::diag_types;

diag_types!(
    outline,
    // Directive structure.
    err_unmatched_elif = "An `#elif` was found outside of any `#if` block.",
    err_unmatched_else = "An `#else` was found outside of any `#if` block.",
    err_unmatched_endif = "An `#endif` was found outside of any `#if` block.",
    err_double_else = "An `#elif` or `#else` was found in an `#if` block that already had an `#else`.",
    err_unclosed_if = "An `#if` block was still open at the end of the file.",
    // Remarks.
    err_unknown_directive = "A `#` was found that does not start a directive allowed at this point, while `#` comments are not accepted.",
);
