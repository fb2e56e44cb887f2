use super::search_ui::{wait_for_results, ErrorMessages, SearchUI};
use crate::output::Output;
use color_eyre::Result;
use movie_search_core::view_models::movies_list::{EMPTY_DATA_TITLE, ERROR_TITLE};
use movie_search_core::view_models::MoviesListViewModelActions;

pub async fn run_search(query: &str, pages: u32, output: &Output) -> Result<()> {
    if query.trim().is_empty() {
        return Err(color_eyre::eyre::eyre!("Search query must not be empty"));
    }

    let container = super::load_scene()?;
    let mut view_model = container.make_movies_list_view_model(MoviesListViewModelActions::default());

    let ui = SearchUI::new(output);
    ui.attach(&mut view_model);
    let errors = ErrorMessages::attach(&mut view_model);

    view_model.did_search(query);
    let mut completed = wait_for_results(&mut view_model).await;

    while completed && view_model.current_page() < pages && view_model.has_more_pages() {
        let before = view_model.current_page();
        view_model.did_load_next_page();
        completed = wait_for_results(&mut view_model).await;
        if view_model.current_page() == before {
            // The page failed; its message is reported below
            break;
        }
    }

    if !completed {
        output.warn("Search cancelled");
    }

    let messages = errors.drain();
    if view_model.is_empty() {
        if let Some(message) = messages.last() {
            return Err(color_eyre::eyre::eyre!("{}", message));
        }
        output.info(format!("{}: nothing found for '{}'", EMPTY_DATA_TITLE, view_model.query.get()));
        return Ok(());
    }

    for message in &messages {
        output.error(format!("{}: {}", ERROR_TITLE, message));
    }

    output.movies(
        view_model.query.get(),
        view_model.items.get(),
        view_model.current_page(),
        view_model.total_pages(),
    );

    Ok(())
}
