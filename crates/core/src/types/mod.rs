//! Core types for StyleHub.
//!
//! Every struct here mirrors a JSON shape on the storefront REST API and
//! uses camelCase field names on the wire.

pub mod address;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod claim;
pub mod coupon;
pub mod curation;
pub mod email;
pub mod envelope;
pub mod id;
pub mod inquiry;
pub mod like;
pub mod order;
pub mod price;
pub mod status;

pub use address::{AddressResponse, CreateAddressRequest};
pub use auth::{AuthResponse, AuthUser, LoginRequest, RefreshRequest, SignupRequest};
pub use cart::{AddToCartRequest, CartItemResponse, CartResponse, LocalCartItem, UpdateCartItemRequest};
pub use catalog::{CategoryItem, ProductDetail, ProductPage, ProductQuery, ProductSummary};
pub use claim::{ClaimItem, ClaimItemRequest, ClaimPage, ClaimResponse, ClaimSummary, CreateClaimRequest};
pub use coupon::{Coupon, best_coupon};
pub use curation::{CurationProduct, CurationResponse};
pub use email::{Email, EmailError};
pub use envelope::{ApiResponse, ErrorBody};
pub use id::*;
pub use inquiry::{CreateInquiryRequest, Inquiry, InquiryPage};
pub use like::{LikeState, LikedProduct};
pub use order::{
    CreateOrderRequest, OrderItemRequest, OrderItemResponse, OrderPage, OrderResponse,
    OrderSummaryItem, OrderSummaryResponse,
};
pub use price::format_won;
pub use status::*;
