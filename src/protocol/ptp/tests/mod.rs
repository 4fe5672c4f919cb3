mod clock;
mod timestamp;
