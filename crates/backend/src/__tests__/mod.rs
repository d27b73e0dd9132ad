mod helpers;
mod pipeline;
mod reload;
