// storefront_cli/src/commands/catalog.rs
use crate::commands::print_json;
use crate::errors::AppError;
use crate::state::AppState;
use clap::Args;
use storefront::checkout::load_districts;
use storefront::models::{Category, Product, ProductQuery};

#[derive(Args)]
pub struct ProductsArgs {
  #[arg(long, help = "Only products of this level-1 category")]
  pub category: Option<u64>,
  #[arg(long, default_value_t = 1)]
  pub page: u32,
  #[arg(long, default_value_t = 20)]
  pub page_size: u32,
}

fn product_line(product: &Product) -> String {
  let mut line = format!("{:>6}  {}  {} FCFA", product.product_id, product.name_fr, product.price);
  if let Some(percent) = product.discount_percent() {
    line.push_str(&format!("  (-{}%)", percent));
  }
  line.push_str(&format!("  stock {}", product.stock));
  line
}

pub async fn handle_categories(state: &AppState, json: bool) -> anyhow::Result<()> {
  let mut categories = vec![Category::all()];
  categories.extend(state.api.list_categories().await?);
  if json {
    return print_json(&categories);
  }
  for category in &categories {
    match category.category_id {
      Some(id) => println!("{:>6}  {}", id, category.name_fr),
      None => println!("{:>6}  {}", "-", category.name_fr),
    }
  }
  Ok(())
}

pub async fn handle_products(state: &AppState, args: ProductsArgs, json: bool) -> anyhow::Result<()> {
  let query = ProductQuery {
    page: args.page,
    page_size: args.page_size,
    category_id: args.category,
  };
  let page = state.api.list_products(&query).await?;
  if json {
    return print_json(&page.items);
  }
  for product in &page.items {
    println!("{}", product_line(product));
  }
  if page.has_more() {
    println!("More products on page {}", page.page + 1);
  }
  Ok(())
}

pub async fn handle_product(state: &AppState, id: u64, json: bool) -> anyhow::Result<()> {
  let product = state.api.get_product(id).await?;
  let variants = if product.has_variants() {
    state.api.get_variants(id).await?
  } else {
    Vec::new()
  };
  if json {
    return print_json(&serde_json::json!({ "product": product, "variants": variants }));
  }
  println!("{}", product_line(&product));
  if let Some(original) = product.original_price {
    println!("        was {} FCFA", original);
  }
  for variant in &variants {
    println!(
      "        variant {}: {}",
      variant.product_id,
      variant.variant_name.as_deref().unwrap_or(&variant.name_fr)
    );
  }
  Ok(())
}

pub async fn handle_districts(state: &AppState, json: bool) -> anyhow::Result<()> {
  let districts = load_districts(state.api.as_ref())
    .await
    .map_err(AppError::DistrictsUnavailable)?;
  if json {
    return print_json(&districts);
  }
  for district in &districts {
    println!(
      "{:>4}  {} ({})  {}",
      district.id,
      district.name,
      district.city_name,
      district.center()
    );
  }
  Ok(())
}
