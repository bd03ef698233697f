//! Expansion of `#[contract]`.
//!
//! The trait is read into a [`ContractDescription`] whose value types are placeholders and registered through
//! `fauxbuild_core` before any code is emitted, so a trait the dispatcher would reject never compiles. Real value
//! types are filled in by the generated `description()` through `SlotValue::TYPE` and `FromSlot::DESC`, which is
//! where a writer and reader disagreeing on a slot's type is caught.

use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::spanned::Spanned;
use syn::{
    Attribute, FnArg, GenericArgument, ItemTrait, LitStr, Meta, PathArguments, ReturnType, Signature, TraitItem,
    TraitItemFn, Type, parse_quote,
};

use fauxbuild_core::{Contract, ContractDescription, NamingConvention, Operation, Role, SlotId, ValueType};

const TERMINAL_ATTR: &str = "terminal";
const WRITER_ATTR: &str = "writer";
const READER_ATTR: &str = "reader";

enum Kind {
    Writer { value: Type },
    Reader { value: Type },
    Terminal { product: Type, error: Type },
}

struct Method {
    sig: Signature,
    kind: Kind,
    explicit: Option<Role>,
}

impl Method {
    fn name(&self) -> String {
        self.sig.ident.to_string()
    }

    /// Operation with placeholder types, enough to classify by name and shape.
    fn placeholder(&self) -> Option<Operation> {
        let op = match &self.kind {
            Kind::Writer { .. } => Operation::writer(self.name(), ValueType::Object),
            Kind::Reader { .. } => Operation::nullable_reader(self.name(), ValueType::Object),
            Kind::Terminal { .. } => return None,
        };
        Some(match &self.explicit {
            Some(role) => op.with_role(role.clone()),
            None => op,
        })
    }
}

pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let convention = parse_convention(attr)?;
    let mut item: ItemTrait = syn::parse2(item)?;
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(item.generics.span(), "contract traits may not be generic"));
    }

    let mut methods = Vec::with_capacity(item.items.len());
    for trait_item in &mut item.items {
        match trait_item {
            TraitItem::Fn(method) => methods.push(analyze(method)?),
            other => return Err(syn::Error::new(other.span(), "contract traits may only declare methods")),
        }
    }

    let terminals: Vec<(&Method, &Type, &Type)> = methods
        .iter()
        .filter_map(|m| match &m.kind {
            Kind::Terminal { product, error } => Some((m, product, error)),
            _ => None,
        })
        .collect();
    let (terminal, product, error) = match terminals.as_slice() {
        [one] => *one,
        [] => {
            return Err(syn::Error::new(
                item.ident.span(),
                format!("contract `{}` has no #[terminal] method", item.ident),
            ));
        }
        [_, second, ..] => {
            return Err(syn::Error::new(
                second.0.sig.ident.span(),
                "only one method of a contract may be #[terminal]",
            ));
        }
    };

    let trait_name = item.ident.to_string();
    let product_name = type_name(product);
    let terminal_name = terminal.name();

    let mut placeholder = ContractDescription::new(trait_name.clone(), product_name.clone());
    for method in &methods {
        placeholder = match method.placeholder() {
            Some(op) => placeholder.operation(op),
            None => placeholder.terminal(method.name()),
        };
    }
    let registered = Contract::register(placeholder, convention).map_err(|e| syn::Error::new(item.ident.span(), e))?;
    for (method, (_, role)) in methods.iter().zip(registered.roles()) {
        if *role == Role::Invalid {
            return Err(syn::Error::new(
                method.sig.ident.span(),
                format!(
                    "method `{}` is not a reader or a writer under the {convention} convention",
                    method.name()
                ),
            ));
        }
    }

    let vis = &item.vis;
    let ident = &item.ident;
    let contract_ident = format_ident!("{}Contract", ident);
    let contract_doc = format!("Contract shape of [`{trait_name}`].");
    let convention_path = convention_tokens(convention);
    let operations = methods.iter().filter_map(describe);
    let bodies = methods.iter().map(synthesize);

    Ok(quote! {
        #item

        #[doc = #contract_doc]
        #[derive(Debug, Clone, Copy, Default)]
        #vis struct #contract_ident;

        impl ::fauxbuild::ContractShape for #contract_ident {
            const CONVENTION: ::fauxbuild::NamingConvention = #convention_path;

            fn description() -> ::fauxbuild::ContractDescription {
                ::fauxbuild::ContractDescription::new(#trait_name, #product_name)
                    #(.operation(#operations))*
                    .terminal(#terminal_name)
            }
        }

        impl #contract_ident {
            /// Register this contract and bind a fresh builder finished by `callback`.
            #vis fn create<F>(
                callback: F,
            ) -> ::std::result::Result<::fauxbuild::BuilderProxy<#product, #error, Self>, ::fauxbuild::ContractError>
            where
                F: Fn(&::fauxbuild::BuilderProxy<#product, #error, Self>) -> ::std::result::Result<#product, #error>
                    + 'static,
            {
                ::fauxbuild::BuilderFactory::default().make_typed::<Self, _, _, _>(callback)
            }
        }

        impl #ident for ::fauxbuild::BuilderProxy<#product, #error, #contract_ident> {
            #(#bodies)*
        }
    })
}

fn parse_convention(attr: TokenStream) -> syn::Result<NamingConvention> {
    let mut convention = NamingConvention::default();
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("convention") {
            let lit: LitStr = meta.value()?.parse()?;
            convention = lit
                .value()
                .parse::<NamingConvention>()
                .map_err(|e| syn::Error::new(lit.span(), e))?;
            Ok(())
        } else {
            Err(meta.error("unsupported contract argument, expected `convention = \"...\"`"))
        }
    });
    syn::parse::Parser::parse2(parser, attr)?;
    Ok(convention)
}

/// Slot named by `#[writer(slot = "...")]`; a bare `#[writer]` keeps the method name.
fn slot_override(attr: &Attribute, method: &str) -> syn::Result<SlotId> {
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(SlotId::new(method));
    }
    let mut slot = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("slot") {
            let lit: LitStr = meta.value()?.parse()?;
            slot = Some(lit.value());
            Ok(())
        } else {
            Err(meta.error("expected `slot = \"...\"`"))
        }
    })?;
    Ok(SlotId::new(slot.unwrap_or_else(|| method.to_string())))
}

/// Strip our attributes from `method` and read its shape.
fn analyze(method: &mut TraitItemFn) -> syn::Result<Method> {
    if let Some(body) = &method.default {
        return Err(syn::Error::new(
            body.span(),
            "contract methods are synthesized and may not have a body",
        ));
    }
    let name = method.sig.ident.to_string();

    let mut terminal = false;
    let mut explicit = None;
    let mut kept = Vec::with_capacity(method.attrs.len());
    for attr in method.attrs.drain(..) {
        if attr.path().is_ident(TERMINAL_ATTR) {
            terminal = true;
        } else if attr.path().is_ident(WRITER_ATTR) {
            explicit = Some(Role::Writer(slot_override(&attr, &name)?));
        } else if attr.path().is_ident(READER_ATTR) {
            explicit = Some(Role::Reader(slot_override(&attr, &name)?));
        } else {
            kept.push(attr);
        }
    }
    method.attrs = kept;

    let sig = &method.sig;
    let mutable = sig.receiver().map(|r| r.reference.is_some() && r.mutability.is_some());
    let shared = sig.receiver().is_some_and(|r| r.reference.is_some() && r.mutability.is_none());
    let args: Vec<&Type> = sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat) => Some(&*pat.ty),
            FnArg::Receiver(_) => None,
        })
        .collect();
    let output = match &sig.output {
        ReturnType::Type(_, ty) => Some(&**ty),
        ReturnType::Default => None,
    };

    let kind = if terminal {
        match (mutable, args.as_slice(), output.and_then(result_args)) {
            (Some(true), [], Some((product, error))) => Kind::Terminal {
                product: product.clone(),
                error: error.clone(),
            },
            _ => {
                return Err(syn::Error::new(
                    sig.ident.span(),
                    format!("terminal `{name}` must be declared as `fn {name}(&mut self) -> Result<Product, Error>`"),
                ));
            }
        }
    } else {
        match (mutable, args.as_slice(), output) {
            (Some(true), [value], Some(ret)) if result_args(ret).is_some_and(|(ok, _)| is_self_mut_ref(ok)) => {
                Kind::Writer { value: (*value).clone() }
            }
            (_, [], Some(ret)) if shared => Kind::Reader { value: ret.clone() },
            _ => {
                return Err(syn::Error::new(
                    sig.ident.span(),
                    format!(
                        "method `{name}` is not a reader or a writer: writers take `&mut self` and one value and \
                         return `Result<&mut Self, E>`, readers take `&self` and return a value"
                    ),
                ));
            }
        }
    };

    Ok(Method {
        sig: sig.clone(),
        kind,
        explicit,
    })
}

/// `Result<T, E>` to `(T, E)`.
fn result_args(ty: &Type) -> Option<(&Type, &Type)> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(generics) = &segment.arguments else {
        return None;
    };
    let mut types = generics.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    match (types.next(), types.next(), types.next()) {
        (Some(ok), Some(err), None) => Some((ok, err)),
        _ => None,
    }
}

fn is_self_mut_ref(ty: &Type) -> bool {
    match ty {
        Type::Reference(r) => r.mutability.is_some() && matches!(&*r.elem, Type::Path(p) if p.path.is_ident("Self")),
        _ => false,
    }
}

/// Source spelling of `ty` without the token spacing: `Vec<u8>`, `(i32, char)`, `&'static str`.
fn type_name(ty: &Type) -> String {
    let tokens = ty.to_token_stream().to_string();
    let word = |c: char| c.is_alphanumeric() || c == '_';
    let mut out = String::with_capacity(tokens.len());
    let mut chars = tokens.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ' ' {
            let prev = out.chars().last();
            let next = chars.peek().copied();
            let between_words = prev.is_some_and(word) && next.is_some_and(word);
            if between_words || prev == Some(',') {
                out.push(' ');
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn convention_tokens(convention: NamingConvention) -> TokenStream {
    match convention {
        NamingConvention::Simple => quote!(::fauxbuild::NamingConvention::Simple),
        NamingConvention::SimpleSetter => quote!(::fauxbuild::NamingConvention::SimpleSetter),
        NamingConvention::GetterSetter => quote!(::fauxbuild::NamingConvention::GetterSetter),
    }
}

/// Runtime `Operation` for a writer or reader; the terminal is added separately.
fn describe(method: &Method) -> Option<TokenStream> {
    let name = method.name();
    let op = match &method.kind {
        Kind::Writer { value } => quote! {
            ::fauxbuild::Operation::new(
                #name,
                ::std::vec![<#value as ::fauxbuild::SlotValue>::TYPE],
                ::fauxbuild::ReturnShape::Chain,
            )
        },
        Kind::Reader { value } => quote! {
            ::fauxbuild::Operation::new(
                #name,
                ::std::vec::Vec::new(),
                ::fauxbuild::ReturnShape::Value(<#value as ::fauxbuild::FromSlot>::DESC),
            )
        },
        Kind::Terminal { .. } => return None,
    };
    Some(match &method.explicit {
        Some(Role::Writer(slot)) => {
            let slot = slot.as_str();
            quote!(#op.with_role(::fauxbuild::Role::Writer(::fauxbuild::SlotId::new(#slot))))
        }
        Some(Role::Reader(slot)) => {
            let slot = slot.as_str();
            quote!(#op.with_role(::fauxbuild::Role::Reader(::fauxbuild::SlotId::new(#slot))))
        }
        _ => op,
    })
}

/// Method body routing through the dispatcher.
fn synthesize(method: &Method) -> TokenStream {
    let mut sig = method.sig.clone();
    let name = method.name();
    match &method.kind {
        Kind::Writer { .. } => {
            for arg in sig.inputs.iter_mut() {
                if let FnArg::Typed(pat) = arg {
                    *pat.pat = parse_quote!(value);
                }
            }
            quote! {
                #sig {
                    ::fauxbuild::BuilderProxy::dispatch(
                        &mut *self,
                        #name,
                        ::std::vec![::fauxbuild::SlotValue::into_value(value)],
                    )?;
                    ::std::result::Result::Ok(self)
                }
            }
        }
        // The proxy is marked with this trait's contract, so the reader always resolves.
        Kind::Reader { value } => quote! {
            #sig {
                let answer = ::fauxbuild::BuilderProxy::read(self, #name).ok().flatten();
                <#value as ::fauxbuild::FromSlot>::from_slot(answer)
            }
        },
        Kind::Terminal { .. } => quote! {
            #sig {
                ::fauxbuild::BuilderProxy::build(self)
            }
        },
    }
}
