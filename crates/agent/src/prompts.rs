use anyhow::{Context as _, Result};
use tera::{Context, Tera};

/// Marker token a positive product classification must contain.
pub const PRODUCT_MARKER: &str = "RETRIEVE_PRODUCT";
/// Marker token a positive order classification must contain.
pub const ORDER_MARKER: &str = "RETRIEVE_ORDER";
/// Literal sentinel the order extraction prompt uses for "no number found".
pub const NO_ORDER_SENTINEL: &str = "NO_ORDER_NUMBER";

const CLASSIFY_PRODUCT: &str = "\
Determine if the following customer query is asking about a specific mobile phone product.

Customer query: {{ message }}

If the customer is asking about a specific phone, its availability, price, features, etc.,
respond with \"RETRIEVE_PRODUCT\".

If the customer is asking about an order status or anything related to an order,
respond with \"NO\".

If the query is not about a specific product or is a general greeting or question,
respond with \"NO\".

Respond with just \"RETRIEVE_PRODUCT\" or \"NO\".";

const CLASSIFY_ORDER: &str = "\
Determine if the following customer query is asking about a specific order.

Customer query: {{ message }}

If the customer is asking about an order status, tracking information, or mentions an order number,
respond with \"RETRIEVE_ORDER\".

If the query is not about an order, respond with \"NO\".

Respond with just \"RETRIEVE_ORDER\" or \"NO\".";

const EXTRACT_PRODUCT: &str = "\
Extract the mobile phone product name or description from the following customer query.
Only extract the product name or type that the customer is asking about.

Customer query: {{ message }}

For example:
- If query is \"Do you have iPhone 15 Pro in stock?\", output \"iPhone 15 Pro\"
- If query is \"Is the Samsung Galaxy S24 Ultra available?\", output \"Samsung Galaxy S24 Ultra\"
- If query is \"Tell me about Google Pixel phones\", output \"Google Pixel\"

Output just the product name or product type, nothing else.";

const EXTRACT_ORDER: &str = "\
Extract the order number from the following customer query.
Only extract the order number that the customer is asking about.

Customer query: {{ message }}

For example:
- If query is \"What's the status of order ORD10001?\", output \"ORD10001\"
- If query is \"When will my order #ORD10003 arrive?\", output \"ORD10003\"
- If query is \"I want to know about order number ORD10002\", output \"ORD10002\"

Output just the order number, nothing else. If no specific order number is mentioned, output \"NO_ORDER_NUMBER\".";

const RESPOND_PRODUCT_MISSING: &str = "\
You are a helpful customer service agent for a mobile phone retailer.
The customer asked: \"{{ message }}\"

We don't have any products matching their description in our inventory.

Provide a helpful response informing them that we don't have the product they're looking for.
Suggest they check out other phones we have available and mention a couple of alternatives from our inventory.
Be polite and professional.";

const RESPOND_PRODUCT_SINGLE: &str = "\
You are a helpful customer service agent for a mobile phone retailer.
The customer asked: \"{{ message }}\"

We have the following product that matches their query:
- Name: {{ name }}
- Brand: {{ brand }}
- Price: ${{ price }}
- Availability: {{ availability }} ({{ stock }} units)
- Description: {{ description }}
- Specifications: {{ specs }}

Provide a helpful response addressing their query about this product.
If they're asking about availability and the product is out of stock, apologize and suggest when it might be back in stock.
Be polite, professional, and stick to the facts about the product.
DO NOT make up information not provided above.";

const RESPOND_PRODUCT_MULTI: &str = "\
You are a helpful customer service agent for a mobile phone retailer.
The customer asked: \"{{ message }}\"

We have several products that match their query:
{{ product_lines }}

Provide a helpful response addressing their query about these products.
If they're asking about a specific one, focus on that one.
If they're asking generally, give an overview of the options.
Be polite, professional, and stick to the facts about the products.
DO NOT make up information not provided above.";

const RESPOND_ORDER_STATUS: &str = "\
You are a helpful customer service agent for a mobile phone retailer.
The customer asked: \"{{ message }}\"

We found the following order information:
- Order ID: {{ order_id }}
- Customer: {{ customer_name }}
- Product: {{ product_name }} ({{ product_id }})
- Quantity: {{ quantity }}
- Status: {{ status }}
- Order Date: {{ order_date }}
- Shipping Address: {{ shipping_address }}
- Tracking Number: {{ tracking_number }}

Provide a helpful response addressing their query about this order.
Be polite, professional, and stick to the facts about the order.
DO NOT make up information not provided above.";

const RESPOND_GENERAL: &str = "\
You are a helpful customer service agent for a mobile phone retailer.
The customer asked: \"{{ message }}\"

We couldn't find specific product or order information related to their query.

Provide a helpful general response. If they're asking about products or services we offer,
give them general information about our mobile phone retail business.

Be polite and professional. Ask clarifying questions if needed.
DO NOT make up specific products or prices.";

/// Fixed instruction templates, registered once and rendered with named
/// context variables.
pub struct PromptLibrary {
    tera: Tera,
}

impl PromptLibrary {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("classify_product", CLASSIFY_PRODUCT),
            ("classify_order", CLASSIFY_ORDER),
            ("extract_product", EXTRACT_PRODUCT),
            ("extract_order", EXTRACT_ORDER),
            ("respond_product_missing", RESPOND_PRODUCT_MISSING),
            ("respond_product_single", RESPOND_PRODUCT_SINGLE),
            ("respond_product_multi", RESPOND_PRODUCT_MULTI),
            ("respond_order_status", RESPOND_ORDER_STATUS),
            ("respond_general", RESPOND_GENERAL),
        ])
        .context("failed to register prompt templates")?;

        Ok(Self { tera })
    }

    pub fn render(&self, template: &str, context: &Context) -> Result<String> {
        self.tera
            .render(template, context)
            .with_context(|| format!("failed to render prompt template `{template}`"))
    }

    pub fn render_message_only(&self, template: &str, message: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("message", message);
        self.render(template, &context)
    }
}

#[cfg(test)]
mod tests {
    use tera::Context;

    use super::{PromptLibrary, NO_ORDER_SENTINEL, ORDER_MARKER, PRODUCT_MARKER};

    #[test]
    fn classification_templates_embed_the_message_and_their_marker() {
        let prompts = PromptLibrary::new().expect("templates register");

        let product = prompts
            .render_message_only("classify_product", "any iPhones left?")
            .expect("renders");
        assert!(product.contains("any iPhones left?"));
        assert!(product.contains(PRODUCT_MARKER));

        let order =
            prompts.render_message_only("classify_order", "where is ORD10001?").expect("renders");
        assert!(order.contains("where is ORD10001?"));
        assert!(order.contains(ORDER_MARKER));
    }

    #[test]
    fn order_extraction_template_names_the_sentinel() {
        let prompts = PromptLibrary::new().expect("templates register");
        let rendered =
            prompts.render_message_only("extract_order", "track my package").expect("renders");
        assert!(rendered.contains(NO_ORDER_SENTINEL));
    }

    #[test]
    fn response_templates_interpolate_named_variables() {
        let prompts = PromptLibrary::new().expect("templates register");

        let mut context = Context::new();
        context.insert("message", "is the Pixel in stock?");
        context.insert("name", "Google Pixel 8 Pro");
        context.insert("brand", "Google");
        context.insert("price", "899.99");
        context.insert("availability", "In Stock");
        context.insert("stock", &8u32);
        context.insert("description", "Google's premium phone");
        context.insert("specs", "storage: 128GB");

        let rendered = prompts.render("respond_product_single", &context).expect("renders");
        assert!(rendered.contains("Google Pixel 8 Pro"));
        assert!(rendered.contains("$899.99"));
        assert!(rendered.contains("In Stock (8 units)"));
    }
}
