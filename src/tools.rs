pub mod httpclient;
