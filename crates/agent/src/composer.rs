use std::sync::Arc;

use anyhow::Result;
use clerky_core::catalog::ResolvedOrder;
use clerky_core::domain::product::Product;
use clerky_core::turn::TurnState;
use tera::Context;

use crate::llm::CompletionClient;
use crate::prompts::PromptLibrary;

/// Placeholder for an order whose tracking number has not been issued.
const TRACKING_UNAVAILABLE: &str = "Not available";
/// Placeholder for an order whose product reference resolves to nothing.
const UNKNOWN_PRODUCT: &str = "Unknown product";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseBranch {
    ProductMissing,
    ProductSingle,
    ProductMulti,
    OrderStatus,
    General,
}

impl ResponseBranch {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProductMissing => "product_missing",
            Self::ProductSingle => "product_single",
            Self::ProductMulti => "product_multi",
            Self::OrderStatus => "order_status",
            Self::General => "general",
        }
    }
}

/// Branch selection checks the product list first, unconditionally, before
/// considering the order. A message that populates both still gets the
/// product branch.
pub fn select_branch(state: &TurnState) -> ResponseBranch {
    match &state.products {
        Some(products) if products.is_empty() => ResponseBranch::ProductMissing,
        Some(products) if products.len() == 1 => ResponseBranch::ProductSingle,
        Some(_) => ResponseBranch::ProductMulti,
        None if state.order.is_some() => ResponseBranch::OrderStatus,
        None => ResponseBranch::General,
    }
}

/// Renders the selected response template and issues the single prose
/// completion for the turn. The completion output is the final response,
/// with no post-processing: the templates instruct the model to stick to
/// the interpolated facts, and that instruction is the whole enforcement.
pub struct ResponseComposer {
    client: Arc<dyn CompletionClient>,
    prompts: Arc<PromptLibrary>,
}

impl ResponseComposer {
    pub fn new(client: Arc<dyn CompletionClient>, prompts: Arc<PromptLibrary>) -> Self {
        Self { client, prompts }
    }

    pub async fn compose(&self, state: &TurnState) -> Result<String> {
        let prompt = self.build_prompt(state)?;
        self.client.complete(&prompt).await
    }

    // Same ladder as `select_branch`, matched on the state directly so each
    // arm borrows the records it interpolates.
    fn build_prompt(&self, state: &TurnState) -> Result<String> {
        match (&state.products, &state.order) {
            (Some(products), _) if products.is_empty() => {
                self.prompts.render_message_only("respond_product_missing", &state.message)
            }
            (Some(products), _) if products.len() == 1 => {
                self.single_product_prompt(&state.message, &products[0])
            }
            (Some(products), _) => self.multi_product_prompt(&state.message, products),
            (None, Some(resolved)) => self.order_status_prompt(&state.message, resolved),
            (None, None) => self.prompts.render_message_only("respond_general", &state.message),
        }
    }

    fn single_product_prompt(&self, message: &str, product: &Product) -> Result<String> {
        let mut context = Context::new();
        context.insert("message", message);
        context.insert("name", &product.name);
        context.insert("brand", &product.brand);
        context.insert("price", &product.price.to_string());
        context.insert("availability", product.availability_label());
        context.insert("stock", &product.stock);
        context.insert("description", &product.description);
        context.insert("specs", &product.specs_summary());
        self.prompts.render("respond_product_single", &context)
    }

    fn multi_product_prompt(&self, message: &str, products: &[Product]) -> Result<String> {
        let product_lines = products
            .iter()
            .map(|product| {
                format!(
                    "- {} ({}): ${}, {} ({} units)",
                    product.name,
                    product.brand,
                    product.price,
                    product.availability_label(),
                    product.stock
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut context = Context::new();
        context.insert("message", message);
        context.insert("product_lines", &product_lines);
        self.prompts.render("respond_product_multi", &context)
    }

    fn order_status_prompt(&self, message: &str, resolved: &ResolvedOrder) -> Result<String> {
        let order = &resolved.order;
        let product_name = resolved
            .product
            .as_ref()
            .map(|product| product.name.as_str())
            .unwrap_or(UNKNOWN_PRODUCT);
        let tracking_number =
            order.tracking_number.as_deref().unwrap_or(TRACKING_UNAVAILABLE);

        let mut context = Context::new();
        context.insert("message", message);
        context.insert("order_id", &order.id.0);
        context.insert("customer_name", &order.customer_name);
        context.insert("product_name", product_name);
        context.insert("product_id", &order.product_id.0);
        context.insert("quantity", &order.quantity);
        context.insert("status", order.status.label());
        context.insert("order_date", &order.order_date.to_string());
        context.insert("shipping_address", &order.shipping_address);
        context.insert("tracking_number", tracking_number);
        self.prompts.render("respond_order_status", &context)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clerky_core::catalog::{Catalog, ResolvedOrder};
    use clerky_core::turn::TurnState;

    use crate::llm::testing::ScriptedClient;
    use crate::prompts::PromptLibrary;

    use super::{select_branch, ResponseBranch, ResponseComposer};

    fn composer(client: Arc<ScriptedClient>) -> ResponseComposer {
        ResponseComposer::new(client, Arc::new(PromptLibrary::new().expect("templates register")))
    }

    fn resolved_order(order_number: &str) -> ResolvedOrder {
        Catalog::seed().resolve_order(order_number).expect("seeded order")
    }

    #[test]
    fn branch_selection_follows_the_five_way_ladder() {
        let base = TurnState::new("hi");

        assert_eq!(select_branch(&base), ResponseBranch::General);
        assert_eq!(
            select_branch(&base.clone().with_products(Vec::new())),
            ResponseBranch::ProductMissing
        );

        let catalog = Catalog::seed();
        let one = catalog.match_products("pixel");
        assert_eq!(
            select_branch(&base.clone().with_products(one)),
            ResponseBranch::ProductSingle
        );

        let many = catalog.match_products("ultra");
        assert_eq!(
            select_branch(&base.clone().with_products(many)),
            ResponseBranch::ProductMulti
        );

        assert_eq!(
            select_branch(&base.with_order(Some(resolved_order("ORD10001")))),
            ResponseBranch::OrderStatus
        );
    }

    #[test]
    fn product_branch_wins_even_when_an_order_is_resolved() {
        let catalog = Catalog::seed();
        let state = TurnState::new("pixel and my order")
            .with_products(catalog.match_products("pixel"))
            .with_order(Some(resolved_order("ORD10001")));

        assert_eq!(select_branch(&state), ResponseBranch::ProductSingle);
    }

    #[test]
    fn empty_product_list_wins_over_a_resolved_order() {
        let state = TurnState::new("nokia and my order")
            .with_products(Vec::new())
            .with_order(Some(resolved_order("ORD10001")));

        assert_eq!(select_branch(&state), ResponseBranch::ProductMissing);
    }

    #[tokio::test]
    async fn single_product_prompt_carries_availability_and_facts() {
        let client = Arc::new(ScriptedClient::with_replies(&["prose"]));
        let composer = composer(client.clone());

        let catalog = Catalog::seed();
        let state = TurnState::new("is the Pixel in stock?")
            .with_products(catalog.match_products("pixel"));
        composer.compose(&state).await.expect("composition runs");

        let prompts = client.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Google Pixel 8 Pro"));
        assert!(prompts[0].contains("In Stock (8 units)"));
        assert!(prompts[0].contains("$899.99"));
    }

    #[tokio::test]
    async fn out_of_stock_product_is_labelled_accordingly() {
        let client = Arc::new(ScriptedClient::with_replies(&["prose"]));
        let composer = composer(client.clone());

        let catalog = Catalog::seed();
        let state =
            TurnState::new("any Xiaomi left?").with_products(catalog.match_products("Xiaomi"));
        composer.compose(&state).await.expect("composition runs");

        assert!(client.prompts()[0].contains("Out of Stock (0 units)"));
    }

    #[tokio::test]
    async fn multi_product_prompt_renders_one_bullet_per_match() {
        let client = Arc::new(ScriptedClient::with_replies(&["prose"]));
        let composer = composer(client.clone());

        let catalog = Catalog::seed();
        let state = TurnState::new("which ultras do you carry?")
            .with_products(catalog.match_products("ultra"));
        composer.compose(&state).await.expect("composition runs");

        let prompt = &client.prompts()[0];
        assert!(prompt.contains("- Samsung Galaxy S24 Ultra (Samsung): $1199.99, In Stock (10 units)"));
        assert!(prompt.contains("- Xiaomi 14 Ultra (Xiaomi): $1099.99, Out of Stock (0 units)"));
    }

    #[tokio::test]
    async fn missing_tracking_number_renders_as_not_available() {
        let client = Arc::new(ScriptedClient::with_replies(&["prose"]));
        let composer = composer(client.clone());

        let state =
            TurnState::new("status of ORD10002?").with_order(Some(resolved_order("ORD10002")));
        composer.compose(&state).await.expect("composition runs");

        let prompt = &client.prompts()[0];
        assert!(prompt.contains("Tracking Number: Not available"));
        assert!(prompt.contains("Samsung Galaxy S24 Ultra (P002)"));
    }

    #[tokio::test]
    async fn dangling_product_reference_renders_as_unknown_product() {
        let client = Arc::new(ScriptedClient::with_replies(&["prose"]));
        let composer = composer(client.clone());

        let mut resolved = resolved_order("ORD10001");
        resolved.product = None;
        let state = TurnState::new("status of ORD10001?").with_order(Some(resolved));
        composer.compose(&state).await.expect("composition runs");

        assert!(client.prompts()[0].contains("Product: Unknown product (P001)"));
    }

    #[tokio::test]
    async fn completion_output_becomes_the_reply_verbatim() {
        let client =
            Arc::new(ScriptedClient::with_replies(&["  Hello! We carry several phones.  "]));
        let composer = composer(client);

        let reply = composer.compose(&TurnState::new("hi")).await.expect("composition runs");
        assert_eq!(reply, "  Hello! We carry several phones.  ");
    }
}
