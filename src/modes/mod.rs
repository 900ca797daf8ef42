pub(crate) mod review;
