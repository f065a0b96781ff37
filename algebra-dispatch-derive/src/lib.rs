#![deny(missing_docs)]
//! # algebra-dispatch-derive — procedural macros for Monoid and Group
//!
//! This crate provides **derive macros** for the `algebra-dispatch`
//! library, producing componentwise instances for product types
//! (structs with named fields).
//!
//! ## Supported derives
//!
//! - **`#[derive(Monoid)]`**: `plus` combines each field with `plus`,
//!   `zero` is each field's `zero`
//! - **`#[derive(Group)]`**: supplies `negate` by negating each field and
//!   names `NegateMcd`, so `minus` is derived
//! - **`#[derive(GroupOperators)]`**: `+`, binary `-` and unary `-`
//!   through `plus`, `minus` and `negate`
//!
//! ## Usage
//!
//! These macros are re-exported through `algebra-dispatch` when the
//! `derive` feature is enabled:
//!
//! ```ignore
//! use algebra_dispatch::{Group, GroupOperators, Monoid};
//!
//! #[derive(Clone, Copy, PartialEq, Debug, Monoid, Group, GroupOperators)]
//! struct Displacement {
//!     dx: i64,
//!     dy: i64,
//! }
//! ```
//!
//! All derived instances are diagonal: `Monoid<Self>` and `Group<Self>`.
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;
use syn::parse_quote;
use syn::Data;
use syn::DeriveInput;
use syn::Fields;
use syn::Generics;
use syn::Ident;
use syn::Type;

/// Internal helper: ensure we're deriving on a struct with named fields.
fn get_named_fields(
    input: &DeriveInput,
) -> Result<&syn::punctuated::Punctuated<syn::Field, syn::token::Comma>, TokenStream> {
    let fields = match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(named) => &named.named,
            _ => {
                let msg = "algebra derives only support structs with named fields";
                return Err(syn::Error::new_spanned(&input.ident, msg)
                    .to_compile_error()
                    .into());
            }
        },
        _ => {
            let msg = "algebra derives are only supported on structs";
            return Err(syn::Error::new_spanned(&input.ident, msg)
                .to_compile_error()
                .into());
        }
    };

    Ok(fields)
}

/// Field names and types, in declaration order.
fn field_parts(input: &DeriveInput) -> Result<(Vec<&Ident>, Vec<&Type>), TokenStream> {
    let fields = get_named_fields(input)?;
    Ok(fields
        .iter()
        .filter_map(|f| f.ident.as_ref().map(|ident| (ident, &f.ty)))
        .unzip())
}

/// `input`'s generics with one predicate per field type.
fn bounded_generics<F>(input: &DeriveInput, field_types: &[&Type], bound: F) -> Generics
where
    F: Fn(&Type) -> syn::WherePredicate,
{
    let mut generics = input.generics.clone();
    {
        let where_clause = generics.make_where_clause();
        for ty in field_types {
            where_clause.predicates.push(bound(ty));
        }
    }
    generics
}

/// Derive macro for `Monoid`.
///
/// Implements `Monoid<Self>` with `Output = Self` for a struct by
/// combining each field with `plus`; `zero` is built from each field's
/// `zero`.
///
/// # Example
///
/// ```ignore
/// #[derive(Monoid)]
/// struct Tally {
///     count: u64,        // zero = 0
///     names: Vec<String>, // zero = []
/// }
/// ```
#[proc_macro_derive(Monoid)]
pub fn derive_monoid(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let (field_idents, field_types) = match field_parts(&input) {
        Ok(parts) => parts,
        Err(ts) => return ts,
    };

    let generics = bounded_generics(&input, &field_types, |ty| {
        parse_quote!(#ty: ::algebra_dispatch::Monoid<#ty, Output = #ty>)
    });
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::algebra_dispatch::Monoid for #name #ty_generics
        #where_clause
        {
            type Output = Self;

            fn plus_impl(self, rhs: Self) -> Self {
                #name {
                    #( #field_idents: ::algebra_dispatch::plus(self.#field_idents, rhs.#field_idents), )*
                }
            }

            fn zero_impl() -> Self {
                #name {
                    #( #field_idents: ::algebra_dispatch::zero::<#field_types>(), )*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for `Group`.
///
/// Supplies `negate` by negating each field and names `NegateMcd`, so
/// `minus(x, y)` is derived as `plus(x, negate(y))`. Requires a
/// `Monoid<Self, Output = Self>` instance, typically `#[derive(Monoid)]`.
///
/// # Example
///
/// ```ignore
/// #[derive(Monoid, Group)]
/// struct Balance {
///     cash: i64,   // the built-in numeric Group
///     credit: f64, // the built-in numeric Group
/// }
/// ```
#[proc_macro_derive(Group)]
pub fn derive_group(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let (field_idents, field_types) = match field_parts(&input) {
        Ok(parts) => parts,
        Err(ts) => return ts,
    };

    let generics = bounded_generics(&input, &field_types, |ty| {
        parse_quote!(#ty: ::algebra_dispatch::Group<#ty, Output = #ty>)
    });
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::algebra_dispatch::NegateImpl for #name #ty_generics
        #where_clause
        {
            fn negate_impl(self) -> Self {
                #name {
                    #( #field_idents: ::algebra_dispatch::negate(self.#field_idents), )*
                }
            }
        }

        impl #impl_generics ::algebra_dispatch::Group for #name #ty_generics
        #where_clause
        {
            type Mcd = ::algebra_dispatch::NegateMcd;
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for operator sugar over `Monoid` and `Group`.
///
/// Implements `Add`, `Sub` and `Neg` by calling `plus`, `minus` and
/// `negate`. The struct must already have a diagonal Group instance.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Copy, Monoid, Group, GroupOperators)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let p = Point { x: 1, y: 2 } - Point { x: 3, y: 1 }; // { x: -2, y: 1 }
/// ```
#[proc_macro_derive(GroupOperators)]
pub fn derive_group_operators(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    if let Err(ts) = get_named_fields(&input) {
        return ts;
    }

    let mut generics = input.generics.clone();
    generics
        .make_where_clause()
        .predicates
        .push(parse_quote!(Self: ::algebra_dispatch::Group<Self, Output = Self>));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::core::ops::Add for #name #ty_generics
        #where_clause
        {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                ::algebra_dispatch::plus(self, rhs)
            }
        }

        impl #impl_generics ::core::ops::Sub for #name #ty_generics
        #where_clause
        {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                ::algebra_dispatch::minus(self, rhs)
            }
        }

        impl #impl_generics ::core::ops::Neg for #name #ty_generics
        #where_clause
        {
            type Output = Self;

            fn neg(self) -> Self {
                ::algebra_dispatch::negate(self)
            }
        }
    };

    TokenStream::from(expanded)
}
