//! # vidshare-service
//!
//! Application layer: use cases over the domain stores, and the DTOs they
//! exchange with the HTTP layer.

pub mod dto;
pub mod services;

pub use services::{
    ChannelService, CommentService, EngagementService, HealthService, LibraryService,
    PlaylistService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    SessionService, VideoService,
};
