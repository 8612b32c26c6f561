use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::{Confirm, Input, Password, Select};

use bricklane_client::{Instruction, InstructionPatch, InstructionsClient, NewInstruction};
use common::media::payload;

use crate::session;

pub async fn login(client: &InstructionsClient, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    let session = client.login(&username, &password).await?;
    let path = session::store_token(&session.token)?;

    println!(
        "{} logged in as {} ({}), token stored in {}",
        style("✓").green(),
        style(&session.username).bold(),
        session.role,
        path.display()
    );
    Ok(())
}

pub async fn products(client: &InstructionsClient) -> Result<()> {
    let products = client.products().await?;
    if products.is_empty() {
        println!("No products in the catalog.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.product_name.clone(),
                p.item_code.clone().unwrap_or_else(|| "N/A".into()),
            ]
        })
        .collect();
    print!("{}", render_table(&["ID", "PRODUCT", "ITEM CODE"], &rows));
    Ok(())
}

pub async fn list(
    client: &InstructionsClient,
    product: Option<i32>,
    filter: Option<String>,
) -> Result<()> {
    let mut instructions = client.list(product).await?;

    if let Some(needle) = filter.as_deref() {
        instructions.retain(|i| matches_filter(i, needle));
    }

    if instructions.is_empty() {
        println!("No instructions found.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = instructions
        .iter()
        .map(|i| {
            vec![
                i.title.clone(),
                i.product.name().unwrap_or("N/A").to_string(),
                i.file.url.clone(),
                i.id.clone(),
            ]
        })
        .collect();
    print!("{}", render_table(&["TITLE", "PRODUCT", "PDF", "ID"], &rows));
    Ok(())
}

pub async fn show(client: &InstructionsClient, id: &str) -> Result<()> {
    let instruction = client.get(id).await?;

    println!("{}", style(&instruction.title).bold());
    println!("  id:         {}", instruction.id);
    match instruction.product.name() {
        Some(name) => println!("  product:    {} (#{})", name, instruction.product.id()),
        None => println!("  product:    #{}", instruction.product.id()),
    }
    println!("  pdf:        {}", instruction.file.url);
    println!("  active:     {}", instruction.is_active);
    println!("  created at: {}", instruction.created_at);
    println!("  updated at: {}", instruction.updated_at);
    Ok(())
}

pub async fn create(
    client: &InstructionsClient,
    product: Option<i32>,
    title: Option<String>,
    file: Option<PathBuf>,
) -> Result<()> {
    let product = match product {
        Some(id) => id,
        None => pick_product(client).await?,
    };

    let title = match title {
        Some(t) => t,
        None => Input::new().with_prompt("Title").interact_text()?,
    };

    let file = match file {
        Some(path) => path,
        None => {
            let raw: String = Input::new().with_prompt("Path to PDF").interact_text()?;
            PathBuf::from(raw)
        }
    };

    let payload = encode_pdf(&file)?;
    let created = client
        .create(&NewInstruction {
            product,
            title,
            file: payload,
        })
        .await?;

    println!(
        "{} {} ({})",
        style("✓").green(),
        created.message,
        created.instruction.id
    );
    Ok(())
}

pub async fn update(
    client: &InstructionsClient,
    id: &str,
    title: Option<String>,
    product: Option<i32>,
) -> Result<()> {
    let patch = if title.is_none() && product.is_none() {
        // No flags: prompt, pre-populated from the record.
        let current = client.get(id).await?;
        let title: String = Input::new()
            .with_prompt("Title")
            .with_initial_text(current.title)
            .interact_text()?;
        InstructionPatch {
            title: Some(title),
            product: None,
        }
    } else {
        InstructionPatch { title, product }
    };

    let updated = client.update(id, &patch).await?;
    println!("{} {}", style("✓").green(), updated.message);
    Ok(())
}

pub async fn replace_file(client: &InstructionsClient, id: &str, file: &Path) -> Result<()> {
    let payload = encode_pdf(file)?;
    let replaced = client.replace_file(id, &payload).await?;

    println!(
        "{} {}, new PDF at {}",
        style("✓").green(),
        replaced.message,
        replaced.instruction.file.url
    );
    Ok(())
}

pub async fn delete(client: &InstructionsClient, id: &str, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete instruction {id} and its PDF?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let message = client.delete(id).await?;
    println!("{} {}", style("✓").green(), message);
    Ok(())
}

/// Interactive product selector fed from the product listing.
async fn pick_product(client: &InstructionsClient) -> Result<i32> {
    let products = client.products().await?;
    if products.is_empty() {
        bail!("No products in the catalog; create one first");
    }

    let labels: Vec<String> = products
        .iter()
        .map(|p| {
            format!(
                "{} - {}",
                p.product_name,
                p.item_code.as_deref().unwrap_or("N/A")
            )
        })
        .collect();

    let picked = Select::new()
        .with_prompt("Product")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(products[picked].id)
}

/// Read a PDF from disk and encode it inline for transport.
fn encode_pdf(path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !is_pdf {
        bail!("Please choose a PDF file");
    }

    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(payload::encode("application/pdf", &bytes))
}

/// Case-insensitive match across every visible column.
fn matches_filter(instruction: &Instruction, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    instruction.title.to_lowercase().contains(&needle)
        || instruction
            .product
            .name()
            .is_some_and(|n| n.to_lowercase().contains(&needle))
        || instruction.id.to_lowercase().contains(&needle)
        || instruction.file.url.to_lowercase().contains(&needle)
}

/// Fixed-width table with a bold header row.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    for (i, header) in headers.iter().enumerate() {
        // Pad before styling so the ANSI codes don't skew the width.
        let padded = format!("{:<width$}", header, width = widths[i]);
        out.push_str(&format!("{}  ", style(padded).bold()));
    }
    out.push('\n');
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            out.push_str(&format!("{cell:<width$}  ", width = widths[i]));
        }
        out.push('\n');
    }
    out
}
