mod helpers;
mod notifications;
mod orders;
mod recommendations;
