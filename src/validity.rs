use super::*;

/// Constraint-validation flags for a single form control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Validity {
    pub(crate) value_missing: bool,
    pub(crate) type_mismatch: bool,
    pub(crate) pattern_mismatch: bool,
    pub(crate) too_short: bool,
    pub(crate) too_long: bool,
    pub(crate) valid: bool,
}

const TEXT_LIKE_INPUT_TYPES: &[&str] = &[
    "text", "search", "url", "tel", "email", "password",
];

pub(crate) fn input_participates_in_constraint_validation(kind: &str) -> bool {
    !matches!(kind, "button" | "submit" | "reset" | "hidden" | "image")
}

fn normalized_input_type(dom: &Dom, node: NodeId) -> String {
    dom.attr(node, "type")
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_else(|| "text".to_string())
}

/// The form an element belongs to: explicit `form` attribute first,
/// otherwise the nearest `form` ancestor.
pub(crate) fn form_owner(dom: &Dom, node: NodeId) -> Option<NodeId> {
    if dom
        .tag_name(node)
        .map(|t| t.eq_ignore_ascii_case("form"))
        .unwrap_or(false)
    {
        return Some(node);
    }
    if let Some(form_id) = dom.attr(node, "form") {
        if let Some(form) = dom.by_id(&form_id) {
            if dom
                .tag_name(form)
                .map(|t| t.eq_ignore_ascii_case("form"))
                .unwrap_or(false)
            {
                return Some(form);
            }
        }
        return None;
    }
    dom.find_ancestor_by_tag(node, "form")
}

pub(crate) fn form_controls(dom: &Dom, form: NodeId) -> Vec<NodeId> {
    dom.all_element_nodes()
        .into_iter()
        .filter(|node| {
            let Some(tag) = dom.tag_name(*node) else {
                return false;
            };
            let is_control = tag.eq_ignore_ascii_case("input")
                || tag.eq_ignore_ascii_case("textarea")
                || tag.eq_ignore_ascii_case("select");
            is_control && form_owner(dom, *node) == Some(form)
        })
        .collect()
}

/// `checkValidity()` on a form: every owned control satisfies its constraints.
pub(crate) fn check_form_validity(dom: &Dom, form: NodeId) -> bool {
    form_controls(dom, form)
        .into_iter()
        .all(|control| compute_control_validity(dom, control).valid)
}

pub(crate) fn compute_control_validity(dom: &Dom, node: NodeId) -> Validity {
    let mut validity = Validity {
        valid: true,
        ..Validity::default()
    };

    let Some(element) = dom.element(node) else {
        return validity;
    };
    // Disabled and readonly controls are barred from constraint validation.
    if element.disabled || element.readonly {
        return validity;
    }

    let tag = element.tag_name.to_ascii_lowercase();
    match tag.as_str() {
        "textarea" => {
            if element.required && element.value.is_empty() {
                validity.value_missing = true;
            }
            apply_length_constraints(dom, node, &element.value, &mut validity);
        }
        "select" => {
            if element.required && element.value.is_empty() {
                validity.value_missing = true;
            }
        }
        "input" => {
            let input_type = normalized_input_type(dom, node);
            if !input_participates_in_constraint_validation(&input_type) {
                return validity;
            }

            if element.required {
                validity.value_missing = match input_type.as_str() {
                    "checkbox" => !element.checked,
                    "radio" => !is_radio_group_checked(dom, node),
                    _ => element.value.is_empty(),
                };
            }

            if !element.value.is_empty() {
                if input_type == "email" && !is_simple_email(&element.value) {
                    validity.type_mismatch = true;
                }

                if TEXT_LIKE_INPUT_TYPES.contains(&input_type.as_str()) {
                    apply_length_constraints(dom, node, &element.value, &mut validity);
                    if let Some(pattern) = dom.attr(node, "pattern") {
                        if pattern_mismatches(&pattern, &element.value) {
                            validity.pattern_mismatch = true;
                        }
                    }
                }
            }
        }
        _ => return validity,
    }

    validity.valid = !(validity.value_missing
        || validity.type_mismatch
        || validity.pattern_mismatch
        || validity.too_short
        || validity.too_long);
    validity
}

fn apply_length_constraints(dom: &Dom, node: NodeId, value: &str, validity: &mut Validity) {
    if value.is_empty() {
        return;
    }
    let value_len = value.chars().count() as i64;
    if let Some(min_len) = parse_attr_i64(dom, node, "minlength") {
        if min_len >= 0 && value_len < min_len {
            validity.too_short = true;
        }
    }
    if let Some(max_len) = parse_attr_i64(dom, node, "maxlength") {
        if max_len >= 0 && value_len > max_len {
            validity.too_long = true;
        }
    }
}

fn parse_attr_i64(dom: &Dom, node: NodeId, name: &str) -> Option<i64> {
    dom.attr(node, name)?.trim().parse::<i64>().ok()
}

fn is_radio_group_checked(dom: &Dom, node: NodeId) -> bool {
    let Some(name) = dom.attr(node, "name") else {
        return dom.checked(node).unwrap_or(false);
    };
    let owner = form_owner(dom, node);
    dom.all_element_nodes().into_iter().any(|candidate| {
        let Some(element) = dom.element(candidate) else {
            return false;
        };
        element.tag_name.eq_ignore_ascii_case("input")
            && element
                .attrs
                .get("type")
                .map(|t| t.eq_ignore_ascii_case("radio"))
                .unwrap_or(false)
            && element.attrs.get("name") == Some(&name)
            && form_owner(dom, candidate) == owner
            && element.checked
    })
}

/// The `pattern` attribute is implicitly anchored; a pattern that fails to
/// compile imposes no constraint, matching browser behavior.
fn pattern_mismatches(pattern: &str, value: &str) -> bool {
    let anchored = format!("^(?:{pattern})$");
    match fancy_regex::Regex::new(&anchored) {
        Ok(regex) => !regex.is_match(value).unwrap_or(true),
        Err(_) => false,
    }
}

pub(crate) fn is_simple_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if local
        .chars()
        .any(|ch| ch.is_ascii_whitespace() || ch == '@')
    {
        return false;
    }
    domain.split('.').all(is_simple_email_domain_label)
}

fn is_simple_email_domain_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}
