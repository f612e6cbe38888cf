use super::*;

mod dom_tree_and_selectors;
mod forms_and_validity;

fn page(html: &str) -> Result<Page> {
    Page::from_html(html)
}

fn installed_page(html: &str) -> Result<Page> {
    let mut page = Page::from_html(html)?;
    page.install_behaviors(BehaviorConfig::default())?;
    Ok(page)
}
