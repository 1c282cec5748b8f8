//! Product listing CRUD, bearer-token protected.
//!
//! - `GET    /api/products`       - list listings, newest first
//! - `POST   /api/products`       - create a listing
//! - `GET    /api/products/{id}`  - fetch one listing
//! - `PUT    /api/products/{id}`  - partial update
//! - `DELETE /api/products/{id}`  - remove a listing

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use sellery_core::auth::tokens::TokenSigner;
use sellery_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};
use sellery_db::repositories::ProductRepository;
use serde::Serialize;
use tracing::info;

use crate::auth::{authenticate, repository_error, ApiError};

#[derive(Clone)]
pub struct ProductsState {
    products: Arc<dyn ProductRepository>,
    signer: TokenSigner,
}

impl ProductsState {
    pub fn new(products: Arc<dyn ProductRepository>, signer: TokenSigner) -> Self {
        Self { products, signer }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

pub fn router(state: ProductsState) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(state)
}

async fn list_products(
    State(state): State<ProductsState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<ApiError>)> {
    authenticate(&headers, &state.signer)?;
    let products = state.products.list().await.map_err(repository_error)?;
    Ok(Json(products))
}

async fn get_product(
    State(state): State<ProductsState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Product>, (StatusCode, Json<ApiError>)> {
    authenticate(&headers, &state.signer)?;

    let product = state
        .products
        .find_by_id(&ProductId(id))
        .await
        .map_err(repository_error)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(ApiError::new("Product not found"))))?;

    Ok(Json(product))
}

async fn create_product(
    State(state): State<ProductsState>,
    headers: HeaderMap,
    Json(payload): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, Json<ApiError>)> {
    authenticate(&headers, &state.signer)?;

    let product = Product::create(payload)
        .map_err(|error| (StatusCode::BAD_REQUEST, Json(ApiError::new(error.to_string()))))?;

    state.products.insert(product.clone()).await.map_err(repository_error)?;

    info!(
        event_name = "products.created",
        product_id = %product.id.0,
        "product listing created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(state): State<ProductsState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, (StatusCode, Json<ApiError>)> {
    authenticate(&headers, &state.signer)?;

    let id = ProductId(id);
    let mut product = state
        .products
        .find_by_id(&id)
        .await
        .map_err(repository_error)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(ApiError::new("Product not found"))))?;

    product
        .apply_patch(patch)
        .map_err(|error| (StatusCode::BAD_REQUEST, Json(ApiError::new(error.to_string()))))?;

    let updated = state.products.update(product.clone()).await.map_err(repository_error)?;
    if !updated {
        return Err((StatusCode::NOT_FOUND, Json(ApiError::new("Product not found"))));
    }

    Ok(Json(product))
}

async fn delete_product(
    State(state): State<ProductsState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<DeleteResponse>, (StatusCode, Json<ApiError>)> {
    authenticate(&headers, &state.signer)?;

    let deleted = state.products.delete(&ProductId(id)).await.map_err(repository_error)?;
    if !deleted {
        return Err((StatusCode::NOT_FOUND, Json(ApiError::new("Product not found"))));
    }

    Ok(Json(DeleteResponse { deleted: true }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode};
    use axum::Json;
    use sellery_core::auth::tokens::TokenSigner;
    use sellery_core::domain::product::{NewProduct, ProductPatch};
    use sellery_core::domain::user::UserId;
    use sellery_db::repositories::InMemoryProductRepository;

    use super::{
        create_product, delete_product, get_product, list_products, update_product, ProductsState,
    };

    fn signer() -> TokenSigner {
        TokenSigner::new("unit-test-signing-secret".to_string().into())
    }

    fn state() -> ProductsState {
        ProductsState::new(Arc::new(InMemoryProductRepository::default()), signer())
    }

    fn authed_headers() -> HeaderMap {
        let token = signer().issue(&UserId("U-test".to_string()), 24);
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.0)).expect("header value"),
        );
        headers
    }

    fn sample_input() -> NewProduct {
        NewProduct {
            title: "LEDSONE 18W Ceiling LED Light".to_string(),
            brand: "LEDSONE".to_string(),
            price_cents: 245_000,
            stock: 40,
            ..NewProduct::default()
        }
    }

    #[tokio::test]
    async fn create_get_update_delete_round_trip() {
        let state = state();

        let (status, Json(created)) =
            create_product(State(state.clone()), authed_headers(), Json(sample_input()))
                .await
                .expect("create");
        assert_eq!(status, StatusCode::CREATED);
        assert!(created.id.0.starts_with("P-"));

        let Json(fetched) =
            get_product(State(state.clone()), Path(created.id.0.clone()), authed_headers())
                .await
                .expect("get");
        assert_eq!(fetched, created);

        let Json(updated) = update_product(
            State(state.clone()),
            Path(created.id.0.clone()),
            authed_headers(),
            Json(ProductPatch { stock: Some(12), ..ProductPatch::default() }),
        )
        .await
        .expect("update");
        assert_eq!(updated.stock, 12);
        assert_eq!(updated.title, created.title);

        let Json(deleted) =
            delete_product(State(state.clone()), Path(created.id.0.clone()), authed_headers())
                .await
                .expect("delete");
        assert!(deleted.deleted);

        let (status, _) = get_product(State(state), Path(created.id.0), authed_headers())
            .await
            .err()
            .expect("deleted product should be gone");
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_returns_created_products() {
        let state = state();
        create_product(State(state.clone()), authed_headers(), Json(sample_input()))
            .await
            .expect("create");

        let Json(listed) = list_products(State(state), authed_headers()).await.expect("list");
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn endpoints_require_a_token() {
        let state = state();

        let (status, Json(body)) = list_products(State(state.clone()), HeaderMap::new())
            .await
            .err()
            .expect("unauthenticated list");
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "Not authorized, token missing");

        let (status, _) =
            create_product(State(state), HeaderMap::new(), Json(sample_input()))
                .await
                .err()
                .expect("unauthenticated create");
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_rejects_invalid_listing() {
        let state = state();

        let (status, Json(body)) = create_product(
            State(state),
            authed_headers(),
            Json(NewProduct { title: "  ".to_string(), ..sample_input() }),
        )
        .await
        .err()
        .expect("blank title should fail");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("title"));
    }

    #[tokio::test]
    async fn update_of_unknown_product_is_not_found() {
        let state = state();

        let (status, _) = update_product(
            State(state),
            Path("P-missing".to_string()),
            authed_headers(),
            Json(ProductPatch { stock: Some(1), ..ProductPatch::default() }),
        )
        .await
        .err()
        .expect("unknown product should fail");

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
