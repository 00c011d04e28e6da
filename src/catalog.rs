//! Catalog repository backing both the storefront and the admin surface.
//!
//! Every write is applied to a copy of the catalog, persisted, and only then
//! published, so readers never observe a change that failed to reach disk.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::aggregates::{Category, Customization, CustomizationOption, Product, SubCategory};
use crate::domain::events::{CatalogEvent, DomainEvent};
use crate::domain::value_objects::{Slug, SlugError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} already exists: {id}")]
    Conflict { kind: &'static str, id: String },
    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
    #[error("catalog data is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("failed to {action} catalog at {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<SlugError> for CatalogError {
    fn from(error: SlugError) -> Self { Self::Invalid { field: "name", message: error.to_string() } }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub logo_url: String,
    pub hero_image_url: String,
    pub about_image_url: String,
    pub contact_image_url: String,
    pub contact: ContactInfo,
    pub social: SocialLinks,
    pub about: AboutContent,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    /// International number without `+`, as used by the messaging app.
    pub whatsapp: String,
    pub address: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub instagram: String,
    pub facebook: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutContent {
    pub title: String,
    pub paragraph1: String,
    pub paragraph2: String,
    pub quote: String,
    pub paragraph3: String,
    pub paragraph4: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogData {
    pub customizations: Vec<Customization>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub site: SiteConfig,
}

/// Storefront listing filter. Empty fields match everything.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    #[serde(default, rename = "featured")]
    pub featured_only: bool,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let category = self.category.as_deref().filter(|c| !c.is_empty());
        let sub_category = self.sub_category.as_deref().filter(|s| !s.is_empty());
        category.map_or(true, |c| product.category_id == c)
            && sub_category.map_or(true, |s| product.sub_category_id.as_deref() == Some(s))
            && (!self.featured_only || product.is_featured)
    }
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

fn non_negative_modifiers(options: &[CustomizationOption]) -> Result<(), ValidationError> {
    if options.iter().any(|o| o.price_modifier.is_sign_negative() && !o.price_modifier.is_zero()) {
        return Err(ValidationError::new("negative_modifier"));
    }
    Ok(())
}

/// Product fields supplied by the admin, used for both create and update.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom = "non_negative")]
    pub price: Decimal,
    #[serde(default)]
    pub stock_level: u32,
    #[validate(length(min = 1))]
    pub category_id: String,
    #[serde(default)]
    pub sub_category_id: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub customization_ids: Vec<String>,
    /// New images; on update they are appended to the existing ones.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl ProductInput {
    fn sub_category(&self) -> Option<String> { self.sub_category_id.clone().filter(|s| !s.is_empty()) }
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

impl CategoryInput {
    fn sub_categories(&self) -> Vec<SubCategory> {
        self.sub_categories.iter().filter(|s| !s.id.is_empty() && !s.name.is_empty()).cloned().collect()
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct CustomizationInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(custom = "non_negative_modifiers")]
    pub options: Vec<CustomizationOption>,
}

#[derive(Clone)]
pub struct CatalogStore {
    state: Arc<RwLock<CatalogData>>,
    path: Option<PathBuf>,
}

impl CatalogStore {
    /// Loads the catalog file. A missing file starts an empty catalog.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no catalog file yet; starting empty");
                CatalogData::default()
            }
            Err(source) => return Err(CatalogError::Io { action: "read", path, source }),
        };
        Ok(Self { state: Arc::new(RwLock::new(data)), path: Some(path) })
    }

    /// A catalog that is never written anywhere.
    pub fn in_memory(data: CatalogData) -> Self {
        Self { state: Arc::new(RwLock::new(data)), path: None }
    }

    pub async fn products(&self, filter: &ProductFilter) -> Vec<Product> {
        self.state.read().await.products.iter().filter(|p| filter.matches(p)).cloned().collect()
    }

    pub async fn featured_products(&self) -> Vec<Product> {
        self.products(&ProductFilter { featured_only: true, ..Default::default() }).await
    }

    pub async fn product(&self, id: &str) -> Option<Product> {
        self.state.read().await.products.iter().find(|p| p.id == id).cloned()
    }

    pub async fn product_by_slug(&self, slug: &str) -> Option<Product> {
        self.state.read().await.products.iter().find(|p| p.slug == slug).cloned()
    }

    pub async fn categories(&self) -> Vec<Category> { self.state.read().await.categories.clone() }

    pub async fn category(&self, id: &str) -> Option<Category> {
        self.state.read().await.categories.iter().find(|c| c.id == id).cloned()
    }

    pub async fn customizations(&self) -> Vec<Customization> { self.state.read().await.customizations.clone() }

    pub async fn customization(&self, id: &str) -> Option<Customization> {
        self.state.read().await.customizations.iter().find(|c| c.id == id).cloned()
    }

    pub async fn site_config(&self) -> SiteConfig { self.state.read().await.site.clone() }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let slug = Slug::from_name(&input.name)?;
        self.mutate(|data| {
            let base = format!("prod-{}", Utc::now().timestamp_millis());
            let mut id = base.clone();
            let mut n = 1;
            while data.products.iter().any(|p| p.id == id) {
                id = format!("{base}-{n}");
                n += 1;
            }
            let product = Product {
                id: id.clone(),
                slug: slug.into_inner(),
                sub_category_id: input.sub_category(),
                name: input.name,
                description: input.description,
                price: input.price,
                image_urls: input.image_urls,
                category_id: input.category_id,
                stock_level: input.stock_level,
                is_featured: input.is_featured,
                customization_ids: Some(input.customization_ids),
            };
            data.products.insert(0, product.clone());
            Ok((product, CatalogEvent::ProductSaved { product_id: id }))
        })
        .await
    }

    pub async fn update_product(&self, id: &str, input: ProductInput) -> Result<Product, CatalogError> {
        let slug = Slug::from_name(&input.name)?;
        self.mutate(|data| {
            let product = data.products.iter_mut().find(|p| p.id == id).ok_or_else(|| not_found("product", id))?;
            product.slug = slug.into_inner();
            product.sub_category_id = input.sub_category();
            product.name = input.name;
            product.description = input.description;
            product.price = input.price;
            product.stock_level = input.stock_level;
            product.category_id = input.category_id;
            product.is_featured = input.is_featured;
            product.customization_ids = Some(input.customization_ids);
            product.image_urls.extend(input.image_urls);
            Ok((product.clone(), CatalogEvent::ProductSaved { product_id: id.to_string() }))
        })
        .await
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), CatalogError> {
        self.mutate(|data| {
            let index = data.products.iter().position(|p| p.id == id).ok_or_else(|| not_found("product", id))?;
            data.products.remove(index);
            Ok(((), CatalogEvent::ProductDeleted { product_id: id.to_string() }))
        })
        .await
    }

    pub async fn delete_product_image(&self, id: &str, image_url: &str) -> Result<Product, CatalogError> {
        self.mutate(|data| {
            let product = data.products.iter_mut().find(|p| p.id == id).ok_or_else(|| not_found("product", id))?;
            product.image_urls.retain(|url| url != image_url);
            Ok((product.clone(), CatalogEvent::ProductSaved { product_id: id.to_string() }))
        })
        .await
    }

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category, CatalogError> {
        self.mutate(|data| {
            if data.categories.iter().any(|c| c.id == input.id) {
                return Err(CatalogError::Conflict { kind: "category", id: input.id });
            }
            let category = Category {
                sub_categories: input.sub_categories(),
                id: input.id,
                name: input.name,
                image_url: input.image_url,
            };
            data.categories.insert(0, category.clone());
            Ok((category.clone(), CatalogEvent::CategorySaved { category_id: category.id }))
        })
        .await
    }

    /// Keeps the current image when the input carries none.
    pub async fn update_category(&self, id: &str, input: CategoryInput) -> Result<Category, CatalogError> {
        self.mutate(|data| {
            let category = data.categories.iter_mut().find(|c| c.id == id).ok_or_else(|| not_found("category", id))?;
            category.sub_categories = input.sub_categories();
            category.name = input.name;
            if let Some(url) = input.image_url.filter(|u| !u.is_empty()) {
                category.image_url = Some(url);
            }
            Ok((category.clone(), CatalogEvent::CategorySaved { category_id: id.to_string() }))
        })
        .await
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), CatalogError> {
        self.mutate(|data| {
            let index = data.categories.iter().position(|c| c.id == id).ok_or_else(|| not_found("category", id))?;
            data.categories.remove(index);
            Ok(((), CatalogEvent::CategoryDeleted { category_id: id.to_string() }))
        })
        .await
    }

    /// Creates or replaces the customization `id`. Options without a value are dropped.
    pub async fn upsert_customization(&self, id: &str, input: CustomizationInput) -> Result<Customization, CatalogError> {
        if id.is_empty() {
            return Err(CatalogError::Invalid { field: "id", message: "must not be empty".into() });
        }
        self.mutate(|data| {
            let customization = Customization {
                id: id.to_string(),
                name: input.name,
                options: input.options.into_iter().filter(|o| !o.value.is_empty()).collect(),
            };
            match data.customizations.iter_mut().find(|c| c.id == id) {
                Some(existing) => *existing = customization.clone(),
                None => data.customizations.push(customization.clone()),
            }
            Ok((customization, CatalogEvent::CustomizationSaved { customization_id: id.to_string() }))
        })
        .await
    }

    /// Deletes a customization and detaches it from every product using it.
    pub async fn delete_customization(&self, id: &str) -> Result<(), CatalogError> {
        self.mutate(|data| {
            let index = data.customizations.iter().position(|c| c.id == id).ok_or_else(|| not_found("customization", id))?;
            data.customizations.remove(index);
            let detached_from = data.products.iter_mut().map(|p| p.detach_customization(id)).filter(|detached| *detached).count();
            Ok(((), CatalogEvent::CustomizationDeleted { customization_id: id.to_string(), detached_from }))
        })
        .await
    }

    pub async fn update_site_config(&self, site: SiteConfig) -> Result<SiteConfig, CatalogError> {
        self.mutate(|data| {
            data.site = site.clone();
            Ok((site, CatalogEvent::SiteConfigSaved))
        })
        .await
    }

    async fn mutate<T, F>(&self, operation: F) -> Result<T, CatalogError>
    where
        F: FnOnce(&mut CatalogData) -> Result<(T, CatalogEvent), CatalogError>,
    {
        let mut state = self.state.write().await;
        let mut draft = state.clone();
        let (result, event) = operation(&mut draft)?;
        self.persist(&draft).await?;
        *state = draft;
        let event = DomainEvent::Catalog(event);
        info!(?event, "catalog updated");
        Ok(result)
    }

    async fn persist(&self, snapshot: &CatalogData) -> Result<(), CatalogError> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| CatalogError::Io { action: "prepare directory for", path: path.clone(), source })?;
        }

        let payload = serde_json::to_vec_pretty(snapshot)?;
        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&temp_path, payload)
            .await
            .map_err(|source| CatalogError::Io { action: "write", path: temp_path.clone(), source })?;
        if let Err(source) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(CatalogError::Io { action: "finalize", path: path.clone(), source });
        }
        Ok(())
    }
}

fn not_found(kind: &'static str, id: &str) -> CatalogError {
    CatalogError::NotFound { kind, id: id.to_string() }
}
