//! Collection command handlers.
//!
//! list, show, add, update, delete, stats, reset.

use magic_keywords::{Category, Depth, Error, Keyword, KeywordFilter, KeywordService, Result};

use super::{FieldArgs, normalize_category, normalize_depth};

/// Lists keywords, optionally filtered.
pub fn cmd_list(
    keywords: &KeywordService,
    search: Option<String>,
    category: Option<String>,
    depth: Option<String>,
    json: bool,
) -> Result<()> {
    let mut filter = KeywordFilter::new();
    if let Some(search) = search {
        filter = filter.with_search(search);
    }
    if let Some(category) = category {
        filter = filter.with_category(normalize_category(&category));
    }
    if let Some(depth) = depth {
        filter = filter.with_depth(normalize_depth(&depth));
    }

    let matches = keywords.list(&filter)?;

    if json {
        let text = serde_json::to_string_pretty(&matches)
            .map_err(|e| Error::operation("serialize_keywords", e))?;
        println!("{text}");
        return Ok(());
    }

    if matches.is_empty() {
        println!("No keywords found");
        return Ok(());
    }

    for k in &matches {
        println!(
            "{}  [{} / {}]",
            k.term,
            Category::label_for(&k.category),
            Depth::label_for(&k.depth)
        );
    }
    println!();
    println!("{} keyword(s)", matches.len());
    Ok(())
}

/// Shows one keyword in full.
pub fn cmd_show(keywords: &KeywordService, term: &str) -> Result<()> {
    let Some(k) = keywords.get(term)? else {
        return Err(Error::NotFound(term.to_string()));
    };

    println!("{}", k.term);
    println!("  Category:      {}", Category::label_for(&k.category));
    println!("  Depth:         {}", Depth::label_for(&k.depth));
    println!("  Description:   {}", k.description);
    if !k.cognitive_impact.is_empty() {
        println!("  Impact:        {}", k.cognitive_impact);
    }
    if !k.examples.is_empty() {
        println!("  Examples:");
        for example in &k.examples {
            println!("    - {example}");
        }
    }
    if !k.related.is_empty() {
        println!("  Related:       {}", k.related.join(", "));
    }
    if !k.cross_domains.is_empty() {
        println!("  Cross-domains: {}", k.cross_domains.join(", "));
    }
    Ok(())
}

/// Adds a keyword.
pub fn cmd_add(keywords: &KeywordService, term: String, fields: FieldArgs) -> Result<()> {
    if fields.description.as_deref().is_none_or(|d| d.trim().is_empty()) {
        return Err(Error::InvalidInput("description is required".to_string()));
    }

    let mut keyword = Keyword::new(term, String::new());
    fields.into_update().apply_to(&mut keyword);

    let created = keywords.create(keyword)?;
    println!("Added: {}", created.term);
    Ok(())
}

/// Updates a keyword.
pub fn cmd_update(
    keywords: &KeywordService,
    term: &str,
    new_term: Option<String>,
    fields: FieldArgs,
) -> Result<()> {
    let mut update = fields.into_update();
    update.term = new_term;
    if update.is_empty() {
        return Err(Error::InvalidInput("nothing to update".to_string()));
    }

    let updated = keywords.update(term, update)?;
    println!("Updated: {}", updated.term);
    Ok(())
}

/// Deletes keywords.
pub fn cmd_delete(keywords: &KeywordService, terms: &[String]) -> Result<()> {
    let removed = match terms {
        [term] => usize::from(keywords.delete(term)?),
        _ => keywords.delete_batch(terms)?,
    };
    println!("Deleted {removed} of {} keyword(s)", terms.len());
    Ok(())
}

/// Prints collection statistics.
pub fn cmd_stats(keywords: &KeywordService, json: bool) -> Result<()> {
    let stats = keywords.statistics()?;

    if json {
        let text = serde_json::to_string_pretty(&stats)
            .map_err(|e| Error::operation("serialize_statistics", e))?;
        println!("{text}");
        return Ok(());
    }

    println!("Keywords: {}", stats.total);
    println!();
    println!("By category:");
    for (tag, count) in &stats.by_category {
        println!("  {:<24} {count}", Category::label_for(tag));
    }
    println!();
    println!("By depth:");
    for (tag, count) in &stats.by_depth {
        println!("  {:<24} {count}", Depth::label_for(tag));
    }
    println!();
    println!("Average examples:      {:.2}", stats.avg_examples);
    println!("Average related:       {:.2}", stats.avg_related);
    println!("Average cross-domains: {:.2}", stats.avg_cross_domains);
    Ok(())
}

/// Resets the collection to the bundled defaults.
pub fn cmd_reset(keywords: &KeywordService) -> Result<()> {
    keywords.reset_to_default()?;
    let count = keywords.get_all()?.len();
    println!("Reset to {count} default keyword(s)");
    Ok(())
}
