// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use crossbeam_channel::unbounded;

use crate::Error;

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Job(Job),
    Drain(Sender<()>),
    Shutdown,
}

/// The serialized execution context of a rolling file.
///
/// Jobs run one at a time, in submission order. Inline executors run them on the caller's thread.
#[derive(Debug)]
pub(crate) enum Executor {
    Inline,
    Background(Worker),
}

impl Executor {
    pub(crate) fn background(thread_name: impl Into<String>) -> Result<Self, Error> {
        Worker::spawn(thread_name.into()).map(Executor::Background)
    }

    /// Run `job` without waiting for it.
    pub(crate) fn execute(&self, job: Job) -> Result<(), Error> {
        match self {
            Executor::Inline => {
                job();
                Ok(())
            }
            Executor::Background(worker) => worker.send(Message::Job(job)),
        }
    }

    /// Run `f` in order with the other jobs and wait for its result.
    pub(crate) fn call<R, F>(&self, f: F) -> Result<R, Error>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        match self {
            Executor::Inline => Ok(f()),
            Executor::Background(worker) => {
                let (tx, rx) = bounded(1);
                worker.send(Message::Job(Box::new(move || {
                    let _ = tx.send(f());
                })))?;
                rx.recv()
                    .map_err(|err| Error::new("logging worker dropped the job").with_source(err))
            }
        }
    }

    /// Wait until every job submitted before this call has run.
    pub(crate) fn drain(&self) -> Result<(), Error> {
        match self {
            Executor::Inline => Ok(()),
            Executor::Background(worker) => {
                let (tx, rx) = bounded(1);
                worker.send(Message::Drain(tx))?;
                rx.recv()
                    .map_err(|err| Error::new("logging worker stopped draining").with_source(err))
            }
        }
    }
}

/// A single thread consuming the job queue.
///
/// Dropping the worker lets it finish the queued jobs, then joins it.
#[derive(Debug)]
pub(crate) struct Worker {
    sender: Sender<Message>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    fn spawn(thread_name: String) -> Result<Self, Error> {
        let (sender, receiver) = unbounded();
        let handle = std::thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || work(receiver))
            .map_err(|err| {
                Error::new("failed to spawn logging worker")
                    .with_context("thread_name", thread_name)
                    .with_source(err)
            })?;
        Ok(Self {
            sender,
            handle: Some(handle),
        })
    }

    fn send(&self, message: Message) -> Result<(), Error> {
        self.sender
            .send(message)
            .map_err(|_| Error::new("failed to send job to logging worker"))
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if self.sender.send(Message::Shutdown).is_err() {
            return;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn work(receiver: Receiver<Message>) {
    // a disconnected channel ends the loop like a shutdown
    while let Ok(message) = receiver.recv() {
        match message {
            Message::Job(job) => job(),
            Message::Drain(done) => {
                let _ = done.send(());
            }
            Message::Shutdown => break,
        }
    }
}
