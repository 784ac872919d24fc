use anyhow::bail;
use colored::Colorize;
use serde_json::json;
use tl_types::{ItemId, ItemList, ListItem, StatusFilter};

const MIN_ID_WIDTH: usize = 8;

/// Find the single item whose id starts with `prefix`. An exact match wins.
pub fn resolve_id(list: &ItemList, prefix: &str) -> anyhow::Result<ItemId> {
    if prefix.is_empty() {
        bail!("empty item id");
    }
    if let Some(item) = list.iter().find(|i| i.id.as_str() == prefix) {
        return Ok(item.id.clone());
    }
    let matches: Vec<&ListItem> = list
        .iter()
        .filter(|i| i.id.as_str().starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [item] => Ok(item.id.clone()),
        [] => bail!("no item matches id {prefix}"),
        _ => bail!("id {prefix} is ambiguous ({} items match)", matches.len()),
    }
}

/// Shortest id prefix width, at least eight characters, that tells every item apart.
pub fn id_width(list: &ItemList) -> usize {
    let longest = list.iter().map(|i| i.id.as_str().len()).max().unwrap_or(0);
    (MIN_ID_WIDTH..longest)
        .find(|&width| {
            let mut seen = std::collections::HashSet::new();
            list.iter().all(|i| seen.insert(prefix(i.id.as_str(), width)))
        })
        .unwrap_or(longest.max(MIN_ID_WIDTH))
}

fn prefix(id: &str, width: usize) -> &str {
    match id.char_indices().nth(width) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

pub fn render_text(list: &ItemList, filter: StatusFilter) -> String {
    let width = id_width(list);
    let mut out = String::new();
    for item in list.filtered(filter) {
        let mark = if item.checked { "[x]".green() } else { "[ ]".normal() };
        let content = if item.checked {
            item.content.dimmed().strikethrough()
        } else {
            item.content.normal()
        };
        out.push_str(&format!(
            "{mark} {} {content}\n",
            prefix(item.id.as_str(), width).yellow()
        ));
    }
    if list.is_empty() {
        out.push_str("Nothing to do.\n");
        return out;
    }
    let active = list.active_count();
    let noun = if active == 1 { "item" } else { "items" };
    out.push_str(&format!(
        "{} {noun} left, {} completed ({filter})\n",
        active.to_string().bold(),
        list.completed_count()
    ));
    out
}

pub fn render_json(list: &ItemList, filter: StatusFilter) -> anyhow::Result<String> {
    let items: Vec<_> = list
        .filtered(filter)
        .into_iter()
        .map(|i| json!({ "id": i.id, "content": i.content, "checked": i.checked }))
        .collect();
    let body = json!({
        "filter": filter.to_string(),
        "active": list.active_count(),
        "completed": list.completed_count(),
        "items": items,
    });
    Ok(serde_json::to_string_pretty(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, content: &str, checked: bool) -> ListItem {
        ListItem::with_id(ItemId::new(id).unwrap(), content).checked(checked)
    }

    fn sample() -> ItemList {
        ItemList::from_items(vec![
            item("0190aaaa-1111", "buy milk", false),
            item("0190aaaa-2222", "call mom", true),
            item("7f00", "short", false),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_unique_prefix_and_exact_id() {
        let list = sample();
        assert_eq!(resolve_id(&list, "0190aaaa-2").unwrap().as_str(), "0190aaaa-2222");
        assert_eq!(resolve_id(&list, "7f00").unwrap().as_str(), "7f00");
    }

    #[test]
    fn ambiguous_or_unknown_prefix_fails() {
        let list = sample();
        assert!(resolve_id(&list, "0190").unwrap_err().to_string().contains("ambiguous"));
        assert!(resolve_id(&list, "zz").is_err());
        assert!(resolve_id(&list, "").is_err());
    }

    #[test]
    fn id_width_grows_until_ids_differ() {
        assert_eq!(id_width(&sample()), 10);
        assert_eq!(id_width(&ItemList::new()), MIN_ID_WIDTH);
    }

    #[test]
    fn text_respects_filter() {
        let text = render_text(&sample(), StatusFilter::Active);
        assert!(text.contains("buy milk"));
        assert!(!text.contains("call mom"));
        assert!(text.contains("left"));
    }

    #[test]
    fn empty_list_text() {
        assert!(render_text(&ItemList::new(), StatusFilter::All).contains("Nothing to do."));
    }

    #[test]
    fn json_has_counts_and_items() {
        let out = render_json(&sample(), StatusFilter::Completed).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["active"], 2);
        assert_eq!(v["completed"], 1);
        assert_eq!(v["items"].as_array().unwrap().len(), 1);
        assert_eq!(v["items"][0]["id"], "0190aaaa-2222");
        assert_eq!(v["items"][0]["checked"], true);
    }
}
