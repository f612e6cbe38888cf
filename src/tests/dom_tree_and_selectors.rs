use super::*;

#[test]
fn parses_nested_elements_and_text() -> Result<()> {
    let page = page(
        r#"
        <div id="outer">
            <p id="inner">Hello <b>world</b></p>
        </div>
        "#,
    )?;
    page.assert_text("#inner", "Hello world")?;
    page.assert_text("#outer", "Hello world")?;
    Ok(())
}

#[test]
fn skips_comments_and_doctype() -> Result<()> {
    let page = page(
        r#"<!DOCTYPE html><!-- header --><div id="a">A</div><!-- trailer -->"#,
    )?;
    page.assert_text("#a", "A")?;
    assert_eq!(page.count("div")?, 1);
    Ok(())
}

#[test]
fn unclosed_comment_is_a_parse_error() {
    let err = page("<div><!-- oops</div>").expect_err("unclosed comment");
    assert!(matches!(err, Error::HtmlParse(_)));
}

#[test]
fn script_and_style_bodies_are_raw_text() -> Result<()> {
    let page = page(
        r#"
        <div id="result">init</div>
        <script>if (1 < 2) { document.title = "<b>never parsed</b>"; }</script>
        <style>p > b { color: red; }</style>
        "#,
    )?;
    assert_eq!(page.count("b")?, 0);
    assert_eq!(page.count("script")?, 1);
    page.assert_text("#result", "init")?;
    Ok(())
}

#[test]
fn void_tags_do_not_nest_following_content() -> Result<()> {
    let page = page(r#"<div id="box"><br><img src="x.png"><span id="s">S</span></div>"#)?;
    page.assert_text("#s", "S")?;
    assert_eq!(page.count("#box > span")?, 1);
    Ok(())
}

#[test]
fn mismatched_end_tags_pop_to_nearest_open_element() -> Result<()> {
    let page = page(r#"<div id="a"><span>one</div><p id="after">after</p>"#)?;
    page.assert_text("#after", "after")?;
    assert_eq!(page.count("div p")?, 0);
    Ok(())
}

#[test]
fn unquoted_and_valueless_attributes_parse() -> Result<()> {
    let page = page(r#"<input id=name type=text required>"#)?;
    assert_eq!(page.count("input[required]")?, 1);
    assert_eq!(page.count("input[type=text]")?, 1);
    Ok(())
}

#[test]
fn duplicate_ids_resolve_to_first_in_document_order() -> Result<()> {
    let page = page(r#"<div id="dup">first</div><div id="dup">second</div>"#)?;
    page.assert_text("#dup", "first")?;
    Ok(())
}

#[test]
fn inner_html_set_replaces_children_and_updates_id_index() -> Result<()> {
    let mut page = page(r#"<div id="box"><span id="old">O</span></div>"#)?;
    page.dom
        .set_inner_html(page.dom.by_id("box").unwrap(), r#"<span id="new">N</span><b>B</b>"#)?;
    assert_eq!(page.count("#old")?, 0);
    assert_eq!(page.count("#new")?, 1);
    page.assert_text("#box", "NB")?;
    Ok(())
}

#[test]
fn inner_html_getter_serializes_text_and_markup() -> Result<()> {
    let page = page(r#"<div id="box">A<i id="x">X</i>C</div>"#)?;
    assert_eq!(page.inner_html("#box")?, r#"A<i id="x">X</i>C"#);
    Ok(())
}

#[test]
fn serialization_escapes_text_and_attribute_values() -> Result<()> {
    let mut page = page(r#"<div id="box"></div>"#)?;
    let box_id = page.dom.by_id("box").unwrap();
    page.dom.create_text(box_id, "a < b & c".to_string());
    page.dom.set_attr(box_id, "title", "say \"hi\"")?;
    assert_eq!(
        page.dom.dump_node(box_id),
        r#"<div id="box" title="say &quot;hi&quot;">a &lt; b &amp; c</div>"#
    );
    Ok(())
}

#[test]
fn class_and_compound_selectors_match() -> Result<()> {
    let page = page(
        r#"
        <section class="card promo">one</section>
        <section class="card">two</section>
        <div class="card">three</div>
        "#,
    )?;
    assert_eq!(page.count(".card")?, 3);
    assert_eq!(page.count("section.card")?, 2);
    assert_eq!(page.count("section.card.promo")?, 1);
    Ok(())
}

#[test]
fn descendant_and_child_combinators() -> Result<()> {
    let page = page(
        r#"
        <div id="top">
            <p><span id="deep">deep</span></p>
            <span id="shallow">shallow</span>
        </div>
        "#,
    )?;
    assert_eq!(page.count("div span")?, 2);
    assert_eq!(page.count("div > span")?, 1);
    assert_eq!(page.count("div > p > span")?, 1);
    Ok(())
}

#[test]
fn selector_groups_union_their_matches() -> Result<()> {
    let page = page(
        r#"
        <div class="product-card">a</div>
        <div class="feature-card">b</div>
        <div class="other">c</div>
        "#,
    )?;
    assert_eq!(page.count(".product-card, .feature-card")?, 2);
    Ok(())
}

#[test]
fn attribute_operators_match_prefix_suffix_substring_and_token() -> Result<()> {
    let page = page(
        r##"
        <a id="frag" href="#pricing">in-page</a>
        <a id="page" href="/pricing#deals">off-page</a>
        <a id="ext" href="https://example.com/docs.html">external</a>
        <div id="tok" class="alpha beta"></div>
        "##,
    )?;
    assert_eq!(page.count(r##"a[href^="#"]"##)?, 1);
    assert_eq!(page.count(r#"a[href$=".html"]"#)?, 1);
    assert_eq!(page.count(r#"a[href*="pricing"]"#)?, 2);
    assert_eq!(page.count(r#"div[class~="beta"]"#)?, 1);
    assert_eq!(page.count(r#"a[href]"#)?, 3);
    Ok(())
}

#[test]
fn attribute_prefix_operator_with_empty_value_matches_nothing() -> Result<()> {
    let page = page(r##"<a href="#x">x</a>"##)?;
    assert_eq!(page.count(r#"a[href^=""]"#)?, 0);
    Ok(())
}

#[test]
fn pseudo_classes_reflect_control_state() -> Result<()> {
    let mut page = page(
        r#"
        <input id="a" type="checkbox" checked>
        <input id="b" type="text" disabled>
        <input id="c" type="text" required>
        "#,
    )?;
    assert_eq!(page.count("input:checked")?, 1);
    assert_eq!(page.count("input:disabled")?, 1);
    assert_eq!(page.count("input:enabled")?, 2);
    assert_eq!(page.count("input:required")?, 1);
    assert_eq!(page.count("input:optional")?, 2);

    page.set_checked("#a", false)?;
    assert_eq!(page.count("input:checked")?, 0);
    Ok(())
}

#[test]
fn unsupported_selector_reports_the_input() {
    let page = page("<div></div>").unwrap();
    let err = page.count("div:nth-child(2)").expect_err("unsupported pseudo");
    assert!(matches!(err, Error::UnsupportedSelector(_)));
    let err = page.count("div ~ p").expect_err("unsupported combinator");
    assert!(matches!(err, Error::UnsupportedSelector(_)));
}

#[test]
fn missing_selector_yields_selector_not_found() {
    let page = page("<div></div>").unwrap();
    let err = page.text("#absent").expect_err("no match");
    assert_eq!(err, Error::SelectorNotFound("#absent".to_string()));
}

#[test]
fn style_property_round_trips_through_the_style_attribute() -> Result<()> {
    let mut page = page(r#"<div id="box" style="color: red; opacity: 0.5"></div>"#)?;
    assert_eq!(page.style("#box", "opacity")?.as_deref(), Some("0.5"));
    let box_id = page.dom.by_id("box").unwrap();
    page.dom.set_style_property(box_id, "opacity", "1")?;
    page.dom.set_style_property(box_id, "transform", "translateY(0)")?;
    assert_eq!(page.style("#box", "opacity")?.as_deref(), Some("1"));
    assert_eq!(page.style("#box", "color")?.as_deref(), Some("red"));
    assert_eq!(
        page.style("#box", "transform")?.as_deref(),
        Some("translateY(0)")
    );
    Ok(())
}

#[test]
fn style_values_with_semicolons_in_parens_survive_parsing() -> Result<()> {
    let page = page(
        r#"<div id="box" style="background: url('a;b.png'); opacity: 0"></div>"#,
    )?;
    assert_eq!(page.style("#box", "opacity")?.as_deref(), Some("0"));
    assert_eq!(
        page.style("#box", "background")?.as_deref(),
        Some("url('a;b.png')")
    );
    Ok(())
}

#[test]
fn deeply_nested_markup_does_not_overflow_the_stack() -> Result<()> {
    let depth = 3000;
    let mut html = String::new();
    for _ in 0..depth {
        html.push_str("<div>");
    }
    html.push_str("<span id=\"leaf\">leaf</span>");
    for _ in 0..depth {
        html.push_str("</div>");
    }
    let page = page(&html)?;
    page.assert_text("#leaf", "leaf")?;
    assert_eq!(page.count("div")?, depth);
    Ok(())
}
