use axum::{extract::State, Json};
use bookshelf_http::extract::{JsonBody, PathParam, QueryParam};
use bookshelf_http::AppError;

use super::SharedRepository;
use crate::modules::books::models::{
    BookCommand, BookCreated, BookDeleted, BookPage, CommandResponse, CreateBook, RatingUpdated,
    SearchBooks, UpdateRating,
};
use crate::utils::{paginate, PageQuery};

/// `GET /books?page=N`
pub async fn list_books(
    State(repository): State<SharedRepository>,
    QueryParam(query): QueryParam<PageQuery>,
) -> Result<Json<BookPage>, AppError> {
    let books = repository.list().await?;
    let page = paginate(&books, query.page());

    if page.is_empty() {
        return Err(AppError::not_found(format!(
            "page {} is outside the {} book catalog",
            query.page(),
            page.total
        )));
    }

    Ok(Json(BookPage {
        success: true,
        books: page.items,
        total_books: page.total,
    }))
}

/// `PATCH /books/{id}`
///
/// The body is validated by the extractor before the id is looked up, so a
/// bad body on an unknown id is still a 400.
pub async fn update_rating(
    State(repository): State<SharedRepository>,
    PathParam(id): PathParam<i64>,
    JsonBody(UpdateRating { rating }): JsonBody<UpdateRating>,
) -> Result<Json<RatingUpdated>, AppError> {
    let Some(mut book) = repository.get(id).await? else {
        return Err(AppError::unprocessable(format!("book {id} does not exist")));
    };

    book.rating = rating;
    if !repository.update(&book).await? {
        return Err(AppError::unprocessable(format!("book {id} does not exist")));
    }

    tracing::info!(target: "project.books", id, rating, "book rating updated");
    Ok(Json(RatingUpdated {
        success: true,
        id,
        rating,
    }))
}

/// `DELETE /books/{id}`
pub async fn delete_book(
    State(repository): State<SharedRepository>,
    PathParam(id): PathParam<i64>,
    QueryParam(query): QueryParam<PageQuery>,
) -> Result<Json<BookDeleted>, AppError> {
    if !repository.delete(id).await? {
        return Err(AppError::unprocessable(format!("book {id} does not exist")));
    }
    tracing::info!(target: "project.books", id, "book deleted");

    let remaining = repository.list().await?;
    let page = paginate(&remaining, query.page());

    Ok(Json(BookDeleted {
        success: true,
        deleted_book: id,
        books: page.items,
        total_books: page.total,
    }))
}

/// `POST /books`: dispatches on the parsed [`BookCommand`]
pub async fn create_or_search(
    State(repository): State<SharedRepository>,
    QueryParam(query): QueryParam<PageQuery>,
    JsonBody(command): JsonBody<BookCommand>,
) -> Result<Json<CommandResponse>, AppError> {
    let response = match command {
        BookCommand::Search(SearchBooks { search }) => {
            let matches = repository.search(&search).await?;
            tracing::debug!(target: "project.books", term = %search, hits = matches.len(), "book search");

            CommandResponse::Search(BookPage {
                success: true,
                total_books: matches.len(),
                books: matches,
            })
        }
        BookCommand::Create(book) => {
            CommandResponse::Created(create_book(&repository, &book, query.page()).await?)
        }
    };

    Ok(Json(response))
}

async fn create_book(
    repository: &SharedRepository,
    book: &CreateBook,
    page: i64,
) -> Result<BookCreated, AppError> {
    book.validate().map_err(AppError::bad_request)?;

    let created_id = repository.create(book).await?;
    tracing::info!(target: "project.books", created_id, title = %book.title, "book created");

    let books = repository.list().await?;
    let page = paginate(&books, page);

    Ok(BookCreated {
        success: true,
        created_id,
        total_books: page.total,
        books: page.items,
    })
}
