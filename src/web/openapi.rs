//! OpenAPI documentation for the web API.

use utoipa::OpenApi;

use super::dto::{
    AddFilesResponse, BinFileResponse, BinInfoResponse, CreateBinResponse, DeleteBinResponse,
    DeleteFileResponse, ServiceInfoResponse,
};
use super::error::{ErrorBody, ErrorCode, ErrorDetail};

/// OpenAPI document served next to the Swagger UI.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "smplbin API",
        description = "Temporary file bins. Upload files, share the bin id, and the bin expires after the retention window."
    ),
    paths(
        super::handlers::landing,
        super::handlers::create_bin,
        super::handlers::get_bin,
        super::handlers::add_files,
        super::handlers::download_file,
        super::handlers::delete_file,
        super::handlers::delete_bin,
    ),
    components(schemas(
        CreateBinResponse, AddFilesResponse, BinInfoResponse, BinFileResponse,
        DeleteFileResponse, DeleteBinResponse, ServiceInfoResponse,
        ErrorBody, ErrorDetail, ErrorCode,
    )),
    tags(
        (name = "bins", description = "Bin lifecycle"),
        (name = "service", description = "Service information")
    )
)]
pub struct ApiDoc;
