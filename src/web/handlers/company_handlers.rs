// src/web/handlers/company_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::database::{CompanyRepository, Database};
use crate::error::{AppError, AppResult};
use crate::models::{Company, CreateCompanyRequest, Page, UpdateCompanyRequest};
use crate::web::types::{ActionResponse, DataResponse, PageQuery};

async fn load_company(database: &Database, id: &str) -> AppResult<Company> {
    CompanyRepository::new(database.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Company", id))
}

fn require_owner(auth: &AuthenticatedUser, company: &Company) -> AppResult<()> {
    if auth.can_manage(company.created_by.as_deref()) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the creator or an admin can manage this company".to_string(),
        ))
    }
}

pub async fn list_companies_handler(
    page: PageQuery,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Page<Company>>>> {
    let companies = CompanyRepository::new(database.pool())
        .list(page.pagination())
        .await?;
    Ok(Json(DataResponse::success(
        format!("Found {} companies", companies.total),
        companies,
    )))
}

pub async fn get_company_handler(
    id: &str,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Company>>> {
    let company = load_company(database, id).await?;
    Ok(Json(DataResponse::success("Company found", company)))
}

pub async fn create_company_handler(
    request: Json<CreateCompanyRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<(Status, Json<DataResponse<Company>>)> {
    let request = request.into_inner();
    request.validate().map_err(AppError::Validation)?;

    let company = Company::new(request, Some(auth.id().to_string()));
    CompanyRepository::new(database.pool())
        .insert(&company)
        .await?;

    info!("User {} created company {}", auth.email(), company.name);
    Ok((
        Status::Created,
        Json(DataResponse::success("Company created", company)),
    ))
}

pub async fn update_company_handler(
    id: &str,
    request: Json<UpdateCompanyRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Company>>> {
    let mut company = load_company(database, id).await?;
    require_owner(&auth, &company)?;

    request
        .into_inner()
        .apply(&mut company)
        .map_err(AppError::Validation)?;
    CompanyRepository::new(database.pool())
        .update(&company)
        .await?;

    Ok(Json(DataResponse::success("Company updated", company)))
}

pub async fn delete_company_handler(
    id: &str,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<ActionResponse>> {
    let company = load_company(database, id).await?;
    require_owner(&auth, &company)?;

    CompanyRepository::new(database.pool())
        .delete(&company.id)
        .await?;

    Ok(Json(ActionResponse::success(
        format!("Company {} deleted", company.name),
        "delete_company",
    )))
}
