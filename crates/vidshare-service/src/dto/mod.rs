//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateCommentRequest, CreatePlaylistRequest, CreateVideoRequest, RateRequest, SearchRequest,
    ToggleRequest, UpdateCommentRequest, UpdateProfileRequest, UpdateVideoRequest,
};

pub use responses::{
    ChannelPageResponse, ChannelResponse, CommentResponse, CommentThreadResponse, CountsResponse,
    EngagementResponse, HealthResponse, PaginatedResponse, PaginationMeta, PlaylistResponse,
    ReadinessResponse,
    VideoEngagementResponse, VideoPageResponse, VideoResponse, ViewCountResponse,
    ViewerEngagementResponse,
};
