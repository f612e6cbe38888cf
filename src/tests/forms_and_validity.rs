use super::*;

#[test]
fn type_text_sets_value_and_fires_input() -> Result<()> {
    let mut page = page(r#"<form><input id="name" type="text"></form>"#)?;
    page.type_text("#name", "Ada")?;
    page.assert_value("#name", "Ada")?;
    Ok(())
}

#[test]
fn type_text_rejects_non_editable_targets() {
    let mut page = page(r#"<div id="box"></div>"#).unwrap();
    let err = page.type_text("#box", "nope").expect_err("div is not editable");
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn type_text_on_disabled_input_is_a_no_op() -> Result<()> {
    let mut page = page(r#"<input id="name" type="text" value="keep" disabled>"#)?;
    page.type_text("#name", "changed")?;
    page.assert_value("#name", "keep")?;
    Ok(())
}

#[test]
fn textarea_takes_its_initial_value_from_its_body() -> Result<()> {
    let page = page(r#"<textarea id="msg">hello there</textarea>"#)?;
    page.assert_value("#msg", "hello there")?;
    Ok(())
}

#[test]
fn select_takes_the_selected_or_first_option() -> Result<()> {
    let page = page(
        r#"
        <select id="first">
            <option value="a">A</option>
            <option value="b">B</option>
        </select>
        <select id="explicit">
            <option value="a">A</option>
            <option value="b" selected>B</option>
        </select>
        <select id="no-value">
            <option>Plain</option>
        </select>
        "#,
    )?;
    page.assert_value("#first", "a")?;
    page.assert_value("#explicit", "b")?;
    page.assert_value("#no-value", "Plain")?;
    Ok(())
}

#[test]
fn checking_a_radio_unchecks_the_rest_of_its_group() -> Result<()> {
    let mut page = page(
        r#"
        <form>
            <input id="r1" type="radio" name="plan" checked>
            <input id="r2" type="radio" name="plan">
            <input id="other" type="radio" name="tier" checked>
        </form>
        "#,
    )?;
    page.set_checked("#r2", true)?;
    assert_eq!(page.count("#r1:checked")?, 0);
    assert_eq!(page.count("#r2:checked")?, 1);
    assert_eq!(page.count("#other:checked")?, 1);
    Ok(())
}

#[test]
fn required_text_input_blocks_validity_until_filled() -> Result<()> {
    let mut page = page(r#"<form id="f"><input id="name" type="text" required></form>"#)?;
    assert!(!page.check_validity("#f")?);
    page.type_text("#name", "Ada")?;
    assert!(page.check_validity("#f")?);
    Ok(())
}

#[test]
fn required_checkbox_must_be_checked() -> Result<()> {
    let mut page = page(r#"<form id="f"><input id="terms" type="checkbox" required></form>"#)?;
    assert!(!page.check_validity("#f")?);
    page.set_checked("#terms", true)?;
    assert!(page.check_validity("#f")?);
    Ok(())
}

#[test]
fn required_radio_group_is_satisfied_by_any_member() -> Result<()> {
    let mut page = page(
        r#"
        <form id="f">
            <input id="r1" type="radio" name="plan" required>
            <input id="r2" type="radio" name="plan">
        </form>
        "#,
    )?;
    assert!(!page.check_validity("#f")?);
    page.set_checked("#r2", true)?;
    assert!(page.check_validity("#f")?);
    Ok(())
}

#[test]
fn length_constraints_apply_only_to_non_empty_values() -> Result<()> {
    let mut page = page(
        r#"<form id="f"><input id="code" type="text" minlength="3" maxlength="5"></form>"#,
    )?;
    assert!(page.check_validity("#f")?);
    page.type_text("#code", "ab")?;
    assert!(!page.check_validity("#f")?);
    page.type_text("#code", "abcd")?;
    assert!(page.check_validity("#f")?);
    page.type_text("#code", "abcdef")?;
    assert!(!page.check_validity("#f")?);
    Ok(())
}

#[test]
fn email_input_requires_a_plausible_address() -> Result<()> {
    let mut page = page(r#"<form id="f"><input id="mail" type="email"></form>"#)?;
    assert!(page.check_validity("#f")?);
    page.type_text("#mail", "not-an-email")?;
    assert!(!page.check_validity("#f")?);
    page.type_text("#mail", "user@example.com")?;
    assert!(page.check_validity("#f")?);
    page.type_text("#mail", "user@-bad-.com")?;
    assert!(!page.check_validity("#f")?);
    Ok(())
}

#[test]
fn pattern_attribute_is_anchored_to_the_whole_value() -> Result<()> {
    let mut page = page(r#"<form id="f"><input id="zip" type="text" pattern="[0-9]{5}"></form>"#)?;
    page.type_text("#zip", "12345")?;
    assert!(page.check_validity("#f")?);
    page.type_text("#zip", "123456")?;
    assert!(!page.check_validity("#f")?);
    page.type_text("#zip", "x12345")?;
    assert!(!page.check_validity("#f")?);
    Ok(())
}

#[test]
fn uncompilable_pattern_imposes_no_constraint() -> Result<()> {
    let mut page = page(r#"<form id="f"><input id="x" type="text" pattern="[unclosed"></form>"#)?;
    page.type_text("#x", "anything")?;
    assert!(page.check_validity("#f")?);
    Ok(())
}

#[test]
fn disabled_and_readonly_controls_are_skipped_by_validation() -> Result<()> {
    let page = page(
        r#"
        <form id="f">
            <input type="text" required disabled>
            <input type="text" required readonly>
        </form>
        "#,
    )?;
    assert!(page.check_validity("#f")?);
    Ok(())
}

#[test]
fn submit_buttons_do_not_participate_in_validation() -> Result<()> {
    let page = page(
        r#"<form id="f"><input type="submit" required><button type="submit">go</button></form>"#,
    )?;
    assert!(page.check_validity("#f")?);
    Ok(())
}

#[test]
fn form_attribute_overrides_ancestor_ownership() -> Result<()> {
    let page = page(
        r#"
        <form id="outer"><input type="text" form="other" required></form>
        <form id="other"></form>
        "#,
    )?;
    assert!(page.check_validity("#outer")?);
    assert!(!page.check_validity("#other")?);
    Ok(())
}

#[test]
fn check_validity_without_a_form_owner_is_an_error() {
    let page = page(r#"<input id="stray" type="text">"#).unwrap();
    let err = page.check_validity("#stray").expect_err("no owning form");
    assert!(matches!(err, Error::Dom(_)));
}

#[test]
fn valid_submit_click_dispatches_submit_on_the_form() -> Result<()> {
    let mut page = page(
        r#"
        <form id="f">
            <input id="name" type="text" required value="Ada">
            <button id="go" type="submit">Go</button>
        </form>
        "#,
    )?;
    page.enable_trace(true);
    page.click("#go")?;
    let logs = page.take_trace_logs();
    assert!(
        logs.iter().any(|line| line.contains("[event] submit")),
        "expected a submit event, got: {logs:?}"
    );
    Ok(())
}

#[test]
fn invalid_submit_click_fires_no_submit_event() -> Result<()> {
    let mut page = page(
        r#"
        <form id="f">
            <input id="name" type="text" required>
            <button id="go" type="submit">Go</button>
        </form>
        "#,
    )?;
    page.enable_trace(true);
    page.click("#go")?;
    let logs = page.take_trace_logs();
    assert!(
        !logs.iter().any(|line| line.contains("[event] submit")),
        "submit fired despite invalid form: {logs:?}"
    );
    Ok(())
}

#[test]
fn programmatic_submit_skips_constraint_validation() -> Result<()> {
    let mut page = page(r#"<form id="f"><input type="text" required></form>"#)?;
    page.enable_trace(true);
    page.submit("#f")?;
    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line.contains("[event] submit")));
    Ok(())
}
