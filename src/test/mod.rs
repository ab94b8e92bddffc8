
mod stream;
mod tag;
