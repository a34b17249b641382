use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::{movie, user},
    models::ReviewWithAuthor,
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn users_page(users: &[user::Model]) -> String {
    page(
        "Filmshelf",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { "Filmshelf" }
                        p class="mt-2 text-gray-600" { "Pick a user to browse their movies." }

                        @if users.is_empty() {
                            p class="mt-8 text-gray-500" { "No users yet." }
                        } @else {
                            ul class="mt-8 divide-y divide-gray-200" {
                                @for user in users {
                                    li class="py-3" {
                                        a class="text-blue-600 hover:text-blue-800 font-medium" href=(format!("/users/{}", user.id)) {
                                            (user.name)
                                        }
                                    }
                                }
                            }
                        }

                        form class="mt-8 flex gap-3" method="post" action="/add_user" {
                            input class="flex-1 rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" name="name" placeholder="New user name" required;
                            button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Add user" }
                        }
                    }
                }
            }
        },
    )
}

pub fn user_movies_page(user: &user::Model, movies: &[movie::Model]) -> String {
    page(
        &format!("Movies of {}", user.name),
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        div class="flex items-start justify-between gap-6" {
                            h1 class="text-3xl font-bold text-gray-900" { "Movies of " (user.name) }
                            a class="text-sm text-blue-600 hover:text-blue-800" href="/" { "All users" }
                        }

                        @if movies.is_empty() {
                            p class="mt-8 text-gray-500" { "No movies yet." }
                        } @else {
                            ul class="mt-8 divide-y divide-gray-200" {
                                @for movie in movies {
                                    li class="py-3 flex items-baseline justify-between gap-4" {
                                        span {
                                            span class="font-medium text-gray-900" { (movie.title) }
                                            @if let Some(year) = movie.year {
                                                span class="ml-2 text-gray-500" { "(" (year) ")" }
                                            }
                                        }
                                        a class="text-sm text-blue-600 hover:text-blue-800" href=(format!("/movies/{}/reviews", movie.id)) {
                                            "Reviews"
                                        }
                                    }
                                }
                            }
                        }

                        a class="mt-8 inline-block rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href=(format!("/users/{}/add_movie", user.id)) {
                            "Add movie"
                        }
                    }
                }
            }
        },
    )
}

pub fn add_movie_page(user: &user::Model) -> String {
    page(
        "Add movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Add a movie for " (user.name) }

                        form class="mt-8 space-y-6" method="post" action=(format!("/users/{}/add_movie", user.id)) {
                            div {
                                label class="block text-sm font-medium text-gray-700" for="title" { "Title" }
                                input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" name="title" id="title" required;
                            }

                            div {
                                label class="block text-sm font-medium text-gray-700" for="year" { "Year (optional)" }
                                input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" name="year" id="year" inputmode="numeric";
                            }

                            button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Add" }
                        }

                        a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href=(format!("/users/{}", user.id)) { "Back" }
                    }
                }
            }
        },
    )
}

pub fn movie_reviews_page(
    movie: &movie::Model,
    reviews: &[ReviewWithAuthor],
    users: &[user::Model],
) -> String {
    page(
        &format!("Reviews for {}", movie.title),
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" {
                            "Reviews for " (movie.title)
                            @if let Some(year) = movie.year {
                                span class="ml-2 font-normal text-gray-500" { "(" (year) ")" }
                            }
                        }

                        @if reviews.is_empty() {
                            p class="mt-8 text-gray-500" { "No reviews yet." }
                        } @else {
                            div class="mt-8 space-y-4" {
                                @for entry in reviews {
                                    (review_card(entry))
                                }
                            }
                        }

                        form class="mt-10 space-y-6 border-t border-gray-200 pt-8" method="post" action=(format!("/movies/{}/reviews", movie.id)) {
                            div {
                                label class="block text-sm font-medium text-gray-700" for="user_id" { "Reviewer" }
                                select class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="user_id" id="user_id" required {
                                    @for user in users {
                                        option value=(user.id) { (user.name) }
                                    }
                                }
                            }

                            div {
                                label class="block text-sm font-medium text-gray-700" for="rating" { "Rating (1-10)" }
                                input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="rating" id="rating" type="number" min="1" max="10" required;
                            }

                            div {
                                label class="block text-sm font-medium text-gray-700" for="review_text" { "Review" }
                                textarea class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="review_text" id="review_text" rows="4" required {}
                            }

                            button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Post review" }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: String) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn review_card(entry: &ReviewWithAuthor) -> Markup {
    html! {
        div class="border-l-4 border-blue-500 pl-4 py-2" {
            div class="flex items-baseline justify-between" {
                span class="font-semibold text-gray-900" { (entry.author_name) }
                span class="text-sm text-gray-500" { "Rating: " (entry.review.rating) }
            }
            @if let Some(text) = &entry.review.text {
                p class="mt-1 text-gray-700" { (text) }
            }
        }
    }
}
