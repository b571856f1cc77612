use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Error, Fields, LitStr};

/// Generates the static token tables of a fieldless token kind enum:
///
/// - `COUNT` and `ALL`, in declaration order (which is the index order of the host's valid
///   symbols vector),
/// - `directive_name`, an exhaustive match returning the `#directive` name of a variant marked
///   with `#[directive("name")]`,
/// - `DIRECTIVES`, a perfect-hash map from directive name to kind.
#[proc_macro_derive(TokenData, attributes(directive))]
pub fn derive_token_data(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let enumdata = match input.data {
        Data::Enum(ref enumdata) => enumdata,
        _ => {
            return Error::new(Span::call_site(), "TokenData should be derived on an enum")
                .to_compile_error()
                .into()
        }
    };
    let mut all = Vec::new();
    let mut name_arms = Vec::new();
    let mut dir_phf = Vec::new();
    for var in enumdata.variants.iter() {
        let varname = &var.ident;
        if !matches!(var.fields, Fields::Unit) {
            return Error::new_spanned(var, "token kinds cannot carry data")
                .to_compile_error()
                .into();
        }
        let mut directive = None;
        for attr in var.attrs.iter() {
            if attr.path.is_ident("directive") {
                match attr.parse_args::<LitStr>() {
                    Ok(lit) => directive = Some(lit),
                    Err(e) => return e.to_compile_error().into(),
                }
                break;
            }
        }
        all.push(quote!(#name::#varname));
        match directive {
            Some(lit) => {
                name_arms.push(quote!(#name::#varname => Some(#lit)));
                dir_phf.push(quote!(#lit => #name::#varname));
            }
            None => name_arms.push(quote!(#name::#varname => None)),
        }
    }
    let count = all.len();
    quote!(
        impl #name {
            /// The number of token kinds.
            pub const COUNT: usize = #count;

            /// All token kinds, in declaration order.
            pub const ALL: [#name; #count] = [#(#all,)*];

            const DIRECTIVES: ::phf::Map<&'static str, #name> = ::phf::phf_map! {
                #(#dir_phf,)*
            };

            /// Returns the directive name (without the `#` sigil) of this kind, if it is
            /// a directive.
            pub fn directive_name(self) -> Option<&'static str> {
                match self {
                    #(#name_arms,)*
                }
            }
        }
    )
    .into()
}
