use std::collections::BTreeMap;

use serde_json::Value;

use crate::schema::{array_base, SchemaType};
use crate::typemap::pg::map_builtin;
use crate::typemap::{EnumType, Field, ObjectType, TargetType, Translations};

use super::registry::TypeRegistry;
use super::{Diagnostic, ResolveOptions};

/// Map one catalog type to its Dart representation.
///
/// Types must be mapped in dependency order: attribute and array element types are read
/// from `registry`. Never fails; anything unrecognized becomes `dynamic` with a diagnostic.
pub fn map_type(
    ty: &SchemaType,
    registry: &TypeRegistry,
    options: &ResolveOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> TargetType {
    let base_name = ty.array_base();
    let is_array = base_name.is_some();
    let name = base_name.unwrap_or(ty.name.as_str());
    let wrap = |target: TargetType| {
        if is_array {
            TargetType::list(target)
        } else {
            target
        }
    };

    if let Some(element) = base_name.and_then(|base| registry.get_catalog_type(base)) {
        return TargetType::list(element.clone());
    }

    if let Some(builtin) = map_builtin(name) {
        return wrap(builtin);
    }

    if !ty.enums.is_empty() {
        let translations = parse_translations(ty, options, diagnostics);
        return wrap(TargetType::Enum(EnumType {
            name: name.to_string(),
            values: ty.enums.clone(),
            translations,
        }));
    }

    if !ty.attributes.is_empty() {
        let fields = ty
            .attributes
            .iter()
            .map(|attr| {
                let field_ty = match registry.get(attr.type_id) {
                    Some(resolved) => resolved.clone(),
                    None => {
                        diagnostics.push(Diagnostic::new(
                            &ty.name,
                            format!(
                                "attribute '{}' references unresolved type {}",
                                attr.name, attr.type_id
                            ),
                        ));
                        TargetType::dynamic()
                    }
                };
                Field {
                    name: attr.name.clone(),
                    ty: field_ty,
                }
            })
            .collect();
        return wrap(TargetType::Composite(ObjectType {
            name: name.to_string(),
            fields,
        }));
    }

    diagnostics.push(Diagnostic::new(&ty.name, "no matching type, using dynamic"));
    TargetType::dynamic()
}

/// Best-effort type for a column whose format never made it into the registry.
pub fn fallback_for_format(format: &str) -> TargetType {
    match array_base(format) {
        Some(base) => map_builtin(base)
            .map(TargetType::list)
            .unwrap_or_else(TargetType::dynamic),
        None => map_builtin(format).unwrap_or_else(TargetType::dynamic),
    }
}

fn parse_translations(
    ty: &SchemaType,
    options: &ResolveOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Translations> {
    let comment = ty.comment.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
    let document: Value = match serde_json::from_str(comment) {
        Ok(document) => document,
        Err(e) => {
            diagnostics.push(Diagnostic::new(
                &ty.name,
                format!("enum comment is not JSON, skipping translations: {e}"),
            ));
            return None;
        }
    };
    match validate_translations(&document, &ty.enums, &options.locales) {
        Ok(translations) => Some(translations),
        Err(reason) => {
            diagnostics.push(Diagnostic::new(
                &ty.name,
                format!("invalid enum translations: {reason}"),
            ));
            None
        }
    }
}

/// Accepts `{"<locale>": {"<enum value>": "<label>", ...}, ...}` with exactly the supported
/// locales, each labelling a subset of the enum's values.
fn validate_translations(
    document: &Value,
    values: &[String],
    locales: &[String],
) -> Result<Translations, String> {
    let object = document
        .as_object()
        .ok_or_else(|| "expected an object keyed by locale".to_string())?;

    if let Some(unknown) = object.keys().find(|k| !locales.contains(*k)) {
        return Err(format!("unsupported locale '{unknown}'"));
    }

    let mut translations = Translations::new();
    for locale in locales {
        let labels = object
            .get(locale)
            .ok_or_else(|| format!("missing locale '{locale}'"))?
            .as_object()
            .ok_or_else(|| format!("labels for '{locale}' must be an object"))?;
        let mut table = BTreeMap::new();
        for (value, label) in labels {
            if !values.contains(value) {
                return Err(format!("'{value}' is not a value of this enum"));
            }
            let label = label
                .as_str()
                .ok_or_else(|| format!("label for '{value}' in '{locale}' must be a string"))?;
            table.insert(value.clone(), label.to_string());
        }
        translations.insert(locale.clone(), table);
    }
    Ok(translations)
}
