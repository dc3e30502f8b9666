//! Product Catalog
//!
//! Static, read-only list of recommendable products. A recommendation's
//! title is matched against it case-insensitively; no match simply means
//! there is no product card to show.

use serde::{Deserialize, Serialize};

/// A recommendable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub link: String,
    /// Who the product is for; fed to the decision policy, never displayed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
}

/// Ordered product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Find a product by title, ignoring case and surrounding whitespace.
    pub fn find_by_title(&self, title: &str) -> Option<&Product> {
        let wanted = title.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.products
            .iter()
            .find(|p| p.title.trim().to_lowercase() == wanted)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products the decision policy may choose from (those with an audience).
    pub fn candidates(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.audience.is_some())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(vec![
            Product {
                id: "carnivore-beginners".to_string(),
                title: "The Definitive Carnivore Beginner's Guide".to_string(),
                description: "A step-by-step path into the carnivore diet: start safely, \
                              skip the common mistakes and feel the difference."
                    .to_string(),
                image_url: "https://images.unsplash.com/photo-1607623814075-e51df1bdc82f?q=80&w=1000&auto=format&fit=crop".to_string(),
                link: "https://pv.guia-iniciante.ketocarnivoro.com/".to_string(),
                audience: Some(
                    "Wants to start strict carnivore; seeks relief from autoimmune issues or total simplicity"
                        .to_string(),
                ),
            },
            Product {
                id: "keto-transformation-21".to_string(),
                title: "21-Day Keto Transformation Guide".to_string(),
                description: "A structured three-week challenge to flip your metabolism, \
                              burn fat and get your energy back."
                    .to_string(),
                image_url: "https://images.unsplash.com/photo-1547592180-85f173990554?q=80&w=1000&auto=format&fit=crop".to_string(),
                link: "https://ketocarnivoro.com/21-dias-ceto/".to_string(),
                audience: Some(
                    "Wants structured weight loss and keto adaptation; still enjoys some vegetables"
                        .to_string(),
                ),
            },
            Product {
                id: "keto-carnivore-recipes".to_string(),
                title: "80+ Keto Recipes".to_string(),
                description: "More than eighty recipes that combine keto and carnivore \
                              so you never get bored of your plate."
                    .to_string(),
                image_url: "https://images.unsplash.com/photo-1544025162-d76690b60943?q=80&w=1000&auto=format&fit=crop".to_string(),
                link: "https://ketocarnivoro.com/40-receitas/".to_string(),
                audience: Some(
                    "Already on the diet; complains about monotony or wants more flavor".to_string(),
                ),
            },
            Product {
                id: "air-fryer-recipes".to_string(),
                title: "80+ Air Fryer Recipes".to_string(),
                description: "Crispy, quick and mess-free keto and carnivore meals \
                              using nothing but an air fryer."
                    .to_string(),
                image_url: "https://images.unsplash.com/photo-1626082927389-6cd097cdc6ec?q=80&w=1000&auto=format&fit=crop".to_string(),
                link: "https://pv.80-air-fryer.ketocarnivoro.com/".to_string(),
                audience: None,
            },
        ])
    }
}
