use crate::derive_utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Expr, Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

#[derive(Clone, Copy)]
pub(crate) enum MarkerKind {
    DomainEvent,
    Event,
}

impl MarkerKind {
    fn attr_name(self) -> &'static str {
        match self {
            MarkerKind::DomainEvent => "#[domain_event]",
            MarkerKind::Event => "#[event]",
        }
    }

    fn trait_path(self) -> proc_macro2::TokenStream {
        match self {
            MarkerKind::DomainEvent => quote! { ::dispatch_domain::DomainEvent },
            MarkerKind::Event => quote! { ::dispatch_domain::Event },
        }
    }
}

/// #[domain_event] / #[event] 宏实现
/// - 支持具名/元组/单元结构体与任意形式的枚举
/// - 生成对应标记 trait 的实现，`NAME` 默认取类型名
/// - 支持：`name = "..."` 覆写 `NAME`
/// - 合并默认派生：Debug, Clone
pub(crate) fn expand(kind: MarkerKind, attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as MarkerAttrConfig);
    let input = parse_macro_input!(item as Item);

    match expand_item(kind, cfg, input) {
        Ok(out) => TokenStream::from(out),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_item(
    kind: MarkerKind,
    cfg: MarkerAttrConfig,
    mut input: Item,
) -> Result<proc_macro2::TokenStream> {
    let required: Vec<syn::Path> = vec![syn::parse_quote!(Debug), syn::parse_quote!(Clone)];

    let (ident, generics) = match &mut input {
        Item::Struct(s) => {
            apply_derives(&mut s.attrs, required);
            (s.ident.clone(), s.generics.clone())
        }
        Item::Enum(e) => {
            apply_derives(&mut e.attrs, required);
            (e.ident.clone(), e.generics.clone())
        }
        // 联合体无法安全派生 Debug/Clone，错误指向 `union` 关键字
        Item::Union(u) => return Err(unsupported(kind, u.union_token.span)),
        other => return Err(unsupported(kind, other.span())),
    };

    let name_lit = cfg
        .name
        .unwrap_or_else(|| syn::LitStr::new(&ident.to_string(), ident.span()));

    let trait_path = kind.trait_path();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        #input

        impl #impl_generics #trait_path for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name_lit;
        }
    })
}

fn unsupported(kind: MarkerKind, span: proc_macro2::Span) -> syn::Error {
    syn::Error::new(
        span,
        format!("{} can only be used on struct or enum types", kind.attr_name()),
    )
}

// 解析宏参数：name = "<literal>"
struct MarkerAttrConfig {
    name: Option<syn::LitStr>,
}

impl Parse for MarkerAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut name: Option<syn::LitStr> = None;

        if input.is_empty() {
            return Ok(Self { name });
        }

        let pairs: Punctuated<syn::MetaNameValue, Token![,]> =
            Punctuated::<syn::MetaNameValue, Token![,]>::parse_terminated(input)?;

        for kv in pairs {
            if !kv.path.is_ident("name") {
                return Err(syn::Error::new(
                    kv.path.span(),
                    "unknown key; expected 'name'",
                ));
            }
            if name.is_some() {
                return Err(syn::Error::new(
                    kv.path.span(),
                    "duplicate key 'name' in attribute",
                ));
            }
            let lit = match kv.value {
                Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(lit),
                    ..
                }) => lit,
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "expected string literal for 'name'",
                    ));
                }
            };
            if lit.value().trim().is_empty() {
                return Err(syn::Error::new(lit.span(), "'name' must not be empty"));
            }
            name = Some(lit);
        }

        Ok(Self { name })
    }
}
