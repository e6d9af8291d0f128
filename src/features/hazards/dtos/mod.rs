mod hazard_dto;

pub use hazard_dto::{
    media_extension, DeleteHazardResponseDto, HazardFormDto, HazardListResponseDto,
    HazardMessageResponseDto, HazardMultipartDto, HazardResponseDto, HealthResponseDto,
    ListHazardsQuery, SortOrder,
};
