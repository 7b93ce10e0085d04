mod rest_genres;
mod rest_movies;
mod rest_people;
mod server_health;
