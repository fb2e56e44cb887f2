use super::prompts::{prompt_select, prompt_string, prompt_yes_no};
use super::search_ui::{is_interactive, wait_for_results, ErrorMessages, SearchUI};
use crate::output::{movies_table, Output};
use color_eyre::Result;
use movie_search_core::view_models::movies_list::{EMPTY_DATA_TITLE, ERROR_TITLE, SCREEN_TITLE, SEARCH_BAR_PLACEHOLDER};
use movie_search_core::view_models::{MoviesListViewModel, MoviesListViewModelActions};
use movie_search_core::MoviesSceneContainer;
use movie_search_models::{Movie, MovieQuery};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::mpsc;

const DETAILS_POSTER_WIDTH: u32 = 500;

enum ResultsAction {
    NewSearch,
    Quit,
}

pub async fn run_browse(output: &Output) -> Result<()> {
    if !is_interactive() || !output.is_human() {
        return Err(color_eyre::eyre::eyre!(
            "browse needs an interactive terminal; use 'moviesearch search <QUERY>' instead"
        ));
    }

    let container = &super::load_scene()?;

    let (selected_tx, selected_rx) = mpsc::channel::<Movie>();
    let actions = MoviesListViewModelActions {
        show_movie_details: Some(Box::new(move |movie: &Movie| {
            let _ = selected_tx.send(movie.clone());
        })),
    };
    let mut view_model = container.make_movies_list_view_model(actions);

    let ui = SearchUI::new(output);
    ui.attach(&mut view_model);
    let errors = ErrorMessages::attach(&mut view_model);

    output.println(format!("\n{}", SCREEN_TITLE.bright_cyan().bold()));

    loop {
        let Some(query) = prompt_query(container).await? else {
            return Ok(());
        };

        view_model.did_select_query(&query);
        if !wait_for_results(&mut view_model).await {
            output.warn("Search cancelled");
        }
        report_errors(&errors, output);

        loop {
            if view_model.is_empty() {
                output.info(format!("{}: nothing found for '{}'", EMPTY_DATA_TITLE, view_model.query.get()));
                break;
            }

            match show_results(&mut view_model, &errors, &selected_rx, container, output).await? {
                Some(ResultsAction::NewSearch) => break,
                Some(ResultsAction::Quit) => return Ok(()),
                None => {}
            }
        }
    }
}

/// Offer recent searches first, otherwise ask for new text; None quits
async fn prompt_query(container: &MoviesSceneContainer) -> Result<Option<MovieQuery>> {
    let (query_tx, query_rx) = mpsc::channel::<MovieQuery>();
    let mut suggestions = container.make_movies_query_list_view_model(Some(Box::new(move |query: MovieQuery| {
        let _ = query_tx.send(query);
    })));
    suggestions.view_will_appear().await;

    let items = suggestions.items.get().clone();
    if !items.is_empty() {
        let mut choices = vec!["New search...".to_string()];
        choices.extend(items.iter().map(|item| item.query.clone()));

        let selection = prompt_select("Recent searches", &choices)?;
        if let Some(item) = selection.checked_sub(1).and_then(|i| items.get(i)) {
            suggestions.did_select(item);
            if let Ok(query) = query_rx.try_recv() {
                return Ok(Some(query));
            }
        }
    }

    let text = prompt_string(&format!("{} (empty to quit)", SEARCH_BAR_PLACEHOLDER), None)?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    Ok(Some(MovieQuery::new(text)))
}

async fn show_results(
    view_model: &mut MoviesListViewModel,
    errors: &ErrorMessages,
    selected_rx: &mpsc::Receiver<Movie>,
    container: &MoviesSceneContainer,
    output: &Output,
) -> Result<Option<ResultsAction>> {
    let items = view_model.items.get().clone();
    println!("{}", movies_table(&items));
    println!("Page {} of {}", view_model.current_page(), view_model.total_pages());

    let mut choices: Vec<String> = items
        .iter()
        .map(|item| format!("{} ({})", item.title, item.release_date))
        .collect();
    let load_more = view_model.has_more_pages().then(|| {
        choices.push("Load more".to_string());
        choices.len() - 1
    });
    choices.push("New search".to_string());
    let new_search = choices.len() - 1;
    choices.push("Quit".to_string());

    let selection = prompt_select("Pick a movie", &choices)?;

    if selection < items.len() {
        view_model.did_select_item(selection);
        if let Ok(movie) = selected_rx.try_recv() {
            show_details(container, &movie, output).await?;
        }
        return Ok(None);
    }
    if Some(selection) == load_more {
        view_model.did_load_next_page();
        if !wait_for_results(view_model).await {
            output.warn("Loading cancelled");
        }
        report_errors(errors, output);
        return Ok(None);
    }
    if selection == new_search {
        return Ok(Some(ResultsAction::NewSearch));
    }
    Ok(Some(ResultsAction::Quit))
}

async fn show_details(container: &MoviesSceneContainer, movie: &Movie, output: &Output) -> Result<()> {
    let mut details = container.make_movie_details_view_model(movie);

    println!("\n{}", details.title.bright_white().bold());
    if !details.overview.is_empty() {
        println!("{}", details.overview);
    }
    println!();

    if details.is_poster_image_hidden() {
        output.info("No poster available");
        return Ok(());
    }
    if !prompt_yes_no("Download poster?", Some(false))? {
        return Ok(());
    }

    let ui = SearchUI::new(output);
    let spinner = ui.start(format!("Downloading poster for {}", details.title));
    let cancel = details.cancellation();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    details.update_poster_image(DETAILS_POSTER_WIDTH).await;
    interrupt.abort();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let Some(image) = details.poster_image.get().clone() else {
        output.warn("Poster could not be downloaded");
        return Ok(());
    };

    let default_name = format!("{}.jpg", movie.id);
    let file = prompt_string("Save poster to", Some(default_name.as_str()))?;
    let file = PathBuf::from(file.trim());
    tokio::fs::write(&file, &image)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write {}: {}", file.display(), e))?;
    output.success(format!("Saved poster ({} bytes) to {}", image.len(), file.display()));
    Ok(())
}

fn report_errors(errors: &ErrorMessages, output: &Output) {
    for message in errors.drain() {
        output.error(format!("{}: {}", ERROR_TITLE, message));
    }
}
